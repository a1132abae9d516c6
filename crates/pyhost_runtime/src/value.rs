//! Runtime values.
//!
//! Scalars are kept deliberately thin: the built-in scalar and container types live outside this crate, and
//! only what the object system itself needs to store or print is modelled here.

use std::fmt;
use std::rc::Rc;

use crate::class::ClassRef;
use crate::errors::{HostFailure, Raised};
use crate::exceptions::ExceptionRef;
use crate::method::BoundMethod;
use crate::modules::ModuleRef;
use crate::object::InstanceRef;

/// Signature of a native function body. The receiver of a bound call arrives as `args[0]`.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, Raised>;

/// A callable owned by a class, a module, or a value.
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    arity: Option<usize>,
    body: Rc<NativeFn>,
}

impl Function {
    /// Create a function accepting any number of arguments.
    pub fn new(name: impl Into<Rc<str>>, body: impl Fn(&[Value]) -> Result<Value, Raised> + 'static) -> Self {
        Self {
            name: name.into(),
            arity: None,
            body: Rc::new(body),
        }
    }

    /// Create a function that fails with [`HostFailure::Arity`] unless called with exactly `arity` arguments.
    pub fn with_arity(
        name: impl Into<Rc<str>>,
        arity: usize,
        body: impl Fn(&[Value]) -> Result<Value, Raised> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity: Some(arity),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Call the function. Whatever the body returns or raises is passed through unchanged.
    pub fn call(&self, args: &[Value]) -> Result<Value, Raised> {
        if let Some(expected) = self.arity {
            if args.len() != expected {
                return Err(HostFailure::Arity {
                    function: self.name.to_string(),
                    expected,
                    got: args.len(),
                }
                .into());
            }
        }
        (self.body)(args)
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Capability of values that carry their own runtime class object.
pub trait RuntimeClass {
    /// The class this value is an instance of, if it carries one.
    fn runtime_class(&self) -> Option<ClassRef>;
}

/// A value flowing through the runtime.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Class(ClassRef),
    Instance(InstanceRef),
    Exception(ExceptionRef),
    Function(Function),
    BoundMethod(Rc<BoundMethod>),
    Module(ModuleRef),
}

impl Value {
    pub fn str(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    /// Name of the value's type, used in messages (`'int' object has no attribute ...`).
    pub fn type_name(&self) -> String {
        match self {
            Value::None => "NoneType".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "str".to_string(),
            Value::Class(_) => "type".to_string(),
            Value::Function(_) => "function".to_string(),
            Value::BoundMethod(_) => "instancemethod".to_string(),
            Value::Instance(_) | Value::Exception(_) | Value::Module(_) => self
                .runtime_class()
                .map_or_else(|| "object".to_string(), |class| class.name().to_string()),
        }
    }

    /// Identity for reference values, equality for scalars.
    pub fn is(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => Rc::ptr_eq(a, b),
            (Value::Module(a), Value::Module(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_module(&self) -> Option<&ModuleRef> {
        match self {
            Value::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceRef> {
        match self {
            Value::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_exception(&self) -> Option<&ExceptionRef> {
        match self {
            Value::Exception(e) => Some(e),
            _ => None,
        }
    }
}

impl RuntimeClass for Value {
    fn runtime_class(&self) -> Option<ClassRef> {
        match self {
            Value::Instance(instance) => Some(instance.class().clone()),
            Value::Exception(exc) => Some(exc.class().clone()),
            Value::Module(module) => module.class().cloned(),
            _ => None,
        }
    }
}

/// Textual form (`str(value)`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => f.write_str(s),
            Value::Class(class) => write!(f, "<class '{}'>", class.name()),
            Value::Instance(instance) => write!(f, "<{} object>", instance.class().name()),
            Value::Exception(exc) => write!(f, "{}", exc.message()),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::BoundMethod(bound) => match bound.describe() {
                Ok(label) => f.write_str(&label),
                Err(_) => write!(f, "<bound method {}>", bound.callable().name()),
            },
            Value::Module(module) => write!(f, "<module '{}'>", module.fq_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<ClassRef> for Value {
    fn from(class: ClassRef) -> Self {
        Value::Class(class)
    }
}

impl From<ModuleRef> for Value {
    fn from(module: ModuleRef) -> Self {
        Value::Module(module)
    }
}
