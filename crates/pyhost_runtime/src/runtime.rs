//! The runtime: explicitly constructed state shared by every component.
//!
//! [`Runtime::bootstrap`] creates the class registry with its core classes, builds the builtin exception
//! taxonomy exactly once, and prepares empty module tables. Everything afterwards goes through `&Runtime`:
//! factories registered with [`Runtime::register_module`], imports through [`Runtime::import`], the entry
//! module through [`Runtime::run_module`], and attribute access through [`Runtime::get_attribute`].

use std::rc::Rc;

use pyhost_core::lang::conventions::{
    BASE_EXCEPTION, FUNCTION_CLASS, INIT_METHOD, MESSAGE_ATTR, METHOD_CLASS, MODULE_CLASS,
};
use pyhost_core::lang::exceptions::{
    ATTRIBUTE_ERROR, BUILTIN_EXCEPTIONS, IMPORT_ERROR, NAME_ERROR, TYPE_ERROR,
};

use crate::builtins::Builtins;
use crate::class::{ClassRef, ClassRegistry};
use crate::config::RuntimeConfig;
use crate::errors::{HostFailure, Raised, RuntimeError};
use crate::exceptions::{ClassNode, ExceptionRef, Exceptions, build_taxonomy};
use crate::method::BoundMethod;
use crate::modules::{ExecutionContext, ModuleCache, ModuleObject, ModuleRef, ModuleRegistry, Resolution};
use crate::object::Instance;
use crate::value::{Function, RuntimeClass, Value};

/// Classes created at bootstrap for values that do not carry their own class tag.
#[derive(Debug, Clone)]
pub struct CoreClasses {
    pub object: ClassRef,
    pub function: ClassRef,
    pub method: ClassRef,
    pub module: ClassRef,
}

/// Runtime state: class registry, builtin namespace, exception taxonomy and module tables.
pub struct Runtime {
    config: RuntimeConfig,
    classes: ClassRegistry,
    core: CoreClasses,
    builtins: Builtins,
    exceptions: Exceptions,
    modules: ModuleRegistry,
    cache: ModuleCache,
}

impl Runtime {
    /// Bootstrap a runtime with the default configuration.
    pub fn new() -> Result<Self, RuntimeError> {
        Self::bootstrap(RuntimeConfig::default())
    }

    /// Create the core classes and the builtin exception taxonomy.
    ///
    /// ## Errors
    /// - [`RuntimeError::DuplicateDefinition`] if the builtin tables repeat a name (a bug in the tables).
    #[tracing::instrument(skip_all, fields(qualifier = %config.qualifier))]
    pub fn bootstrap(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let classes = ClassRegistry::new();
        let core = CoreClasses {
            object: classes.root().clone(),
            function: classes.define(FUNCTION_CLASS, None)?,
            method: classes.define(METHOD_CLASS, None)?,
            module: classes.define(MODULE_CLASS, None)?,
        };

        let mut builtins = Builtins::new();
        for class in [&core.object, &core.function, &core.method, &core.module] {
            builtins.install_class(class);
        }

        let base = classes.define(BASE_EXCEPTION, None)?;
        builtins.install_class(&base);
        let forest = ClassNode::from_static(BUILTIN_EXCEPTIONS);
        let created = build_taxonomy(&classes, &base, &forest, &mut builtins)?;
        let exceptions = Exceptions::new(base, &config.qualifier, created);

        tracing::info!(classes = classes.len(), builtins = builtins.len(), "runtime bootstrapped");
        Ok(Self {
            config,
            classes,
            core,
            builtins,
            exceptions,
            modules: ModuleRegistry::new(),
            cache: ModuleCache::new(),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn core_classes(&self) -> &CoreClasses {
        &self.core
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn exceptions(&self) -> &Exceptions {
        &self.exceptions
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    // ---------------------------------------------------------------------
    // Modules
    // ---------------------------------------------------------------------

    /// Register a module factory. Returns `true` if an earlier factory was replaced.
    pub fn register_module<F>(&self, fq_name: impl Into<String>, factory: F) -> bool
    where
        F: Fn(&ExecutionContext<'_>) -> Result<ModuleRef, Raised> + 'static,
    {
        self.modules.register(fq_name, factory)
    }

    /// Resolve `requested` as imported from `caller`, without instantiating anything.
    pub fn resolve(&self, requested: &str, caller: &str) -> Option<Resolution> {
        self.modules.resolve(requested, caller)
    }

    /// Import `requested` on behalf of the module `caller`.
    ///
    /// ## Errors
    /// - `ImportError` naming `requested` (not the candidates tried) when no tier resolves.
    /// - Whatever the module's factory raises on first instantiation.
    #[tracing::instrument(skip(self))]
    pub fn import(&self, requested: &str, caller: &str) -> Result<ModuleRef, Raised> {
        let resolution = self.resolve(requested, caller).ok_or_else(|| self.import_error(requested))?;
        tracing::debug!(fq_name = %resolution.fq_name, tier = %resolution.tier, "resolved import");
        self.load(&resolution)
    }

    /// Cached instance of an already resolved module, running its factory on first use.
    ///
    /// ## Errors
    /// - Whatever the module's factory raises on first instantiation.
    pub fn load(&self, resolution: &Resolution) -> Result<ModuleRef, Raised> {
        let ctx = ExecutionContext::new(resolution.fq_name.as_str(), resolution.fq_name.as_str(), self);
        self.cache.get_or_create(&self.modules, &ctx)
    }

    /// Instantiate `target` as the program's top-level unit.
    ///
    /// The factory is always invoked; the cache is neither read nor written. The module's declared name is
    /// `display_name` if given, else `target`.
    ///
    /// ## Errors
    /// - `ImportError` if `target` is not registered.
    #[tracing::instrument(skip(self))]
    pub fn run_module(&self, target: &str, display_name: Option<&str>) -> Result<ModuleRef, Raised> {
        let factory = self.modules.factory(target).ok_or_else(|| self.import_error(target))?;
        let ctx = ExecutionContext::new(target, display_name.unwrap_or(target), self);
        factory(&ctx)
    }

    /// `from module import name`.
    pub fn import_from(&self, module: &ModuleObject, name: &str) -> Result<Value, Raised> {
        module.get_attr(name).ok_or_else(|| {
            self.exceptions.raise(
                ATTRIBUTE_ERROR,
                format!("'module' object has no attribute '{name}'"),
            )
        })
    }

    // ---------------------------------------------------------------------
    // Objects
    // ---------------------------------------------------------------------

    /// Define an ad-hoc class. A `None` parent links it to `object`.
    pub fn define_class<I>(&self, name: &str, parent: Option<&ClassRef>, members: I) -> Result<ClassRef, RuntimeError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.classes.define_with_members(name, parent, members)
    }

    /// Pair `receiver` with `callable`.
    pub fn bind(&self, receiver: Value, callable: Function) -> Value {
        Value::BoundMethod(Rc::new(BoundMethod::bind(receiver, callable)))
    }

    /// The class of any value the object system knows about.
    pub fn class_of(&self, value: &Value) -> Option<ClassRef> {
        value.runtime_class().or_else(|| match value {
            Value::Function(_) => Some(self.core.function.clone()),
            Value::BoundMethod(_) => Some(self.core.method.clone()),
            _ => None,
        })
    }

    /// Create an instance of `class`.
    ///
    /// Exception classes take their message from the first argument. Other classes get a fresh instance and
    /// have `__init__` (looked up through the ancestry) called on it as a bound method.
    pub fn instantiate(&self, class: &ClassRef, args: &[Value]) -> Result<Value, Raised> {
        if self.exceptions.is_exception_class(class) {
            let exc = self
                .exceptions
                .instantiate(class, args)
                .map_err(|err| self.raise_runtime_error(err))?;
            return Ok(Value::Exception(exc));
        }

        let instance = Value::Instance(Rc::new(Instance::new(class.clone())));
        match class.lookup(INIT_METHOD) {
            Some(Value::Function(init)) => {
                BoundMethod::bind(instance.clone(), init.clone()).invoke(args)?;
            }
            _ if !args.is_empty() => {
                return Err(self.exceptions.raise(
                    TYPE_ERROR,
                    format!("{}() takes no arguments ({} given)", class.name(), args.len()),
                ));
            }
            _ => {}
        }
        Ok(instance)
    }

    /// Attribute access (`obj.name`).
    ///
    /// Instance attributes win over class members. A class member that is a function is returned bound to
    /// the receiver.
    pub fn get_attribute(&self, obj: &Value, name: &str) -> Result<Value, Raised> {
        let found = match obj {
            Value::Instance(instance) => instance
                .get_attr(name)
                .or_else(|| self.bound_member(obj, instance.class(), name)),
            Value::Exception(exc) if name == MESSAGE_ATTR => Some(exc.message().clone()),
            Value::Exception(exc) => self.bound_member(obj, exc.class(), name),
            Value::Module(module) => module.get_attr(name),
            Value::Class(class) => class.lookup(name).cloned(),
            _ => None,
        };

        found.ok_or_else(|| {
            let message = match obj {
                Value::Class(class) => format!("type object '{}' has no attribute '{name}'", class.name()),
                _ => format!("'{}' object has no attribute '{name}'", obj.type_name()),
            };
            self.exceptions.raise(ATTRIBUTE_ERROR, message)
        })
    }

    fn bound_member(&self, receiver: &Value, class: &ClassRef, name: &str) -> Option<Value> {
        class.lookup(name).map(|member| match member {
            Value::Function(func) => self.bind(receiver.clone(), func.clone()),
            other => other.clone(),
        })
    }

    /// Label of a bound method, raising `AttributeError` if the receiver carries no class.
    pub fn describe(&self, bound: &BoundMethod) -> Result<String, Raised> {
        bound.describe().map_err(|err| self.raise_runtime_error(err))
    }

    // ---------------------------------------------------------------------
    // Errors
    // ---------------------------------------------------------------------

    /// `ImportError` naming the requested module.
    pub fn import_error(&self, requested: &str) -> Raised {
        self.exceptions
            .raise(IMPORT_ERROR, format!("Could not import \"{requested}\"."))
    }

    /// Surface a runtime bookkeeping error to managed code.
    ///
    /// Registry corruption stays a host failure; everything else maps onto the managed taxonomy.
    pub fn raise_runtime_error(&self, err: RuntimeError) -> Raised {
        let text = err.to_string();
        match err {
            RuntimeError::MissingClass { .. } => self.exceptions.raise(ATTRIBUTE_ERROR, text),
            RuntimeError::NotAnException { .. } => self.exceptions.raise(TYPE_ERROR, text),
            RuntimeError::UnknownClass { .. } => self.exceptions.raise(NAME_ERROR, text),
            RuntimeError::DuplicateDefinition { .. } => Raised::Host(HostFailure::Other(text)),
        }
    }

    /// Managed `except class:` matching.
    ///
    /// Host failures are normalized first. Returns the caught exception, or the (normalized) value to keep
    /// propagating.
    pub fn catch(&self, raised: Raised, class: &ClassRef) -> Result<ExceptionRef, Raised> {
        match self.exceptions.exceptionify(raised) {
            Raised::Exception(exc) if exc.is_instance_of(class) => Ok(exc),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_installs_core_and_exceptions() {
        let rt = Runtime::new().unwrap();
        for name in ["object", "function", "method", "module", "BaseException", "ImportError"] {
            assert!(rt.builtins().class(name).is_some(), "{name} missing from builtins");
        }
        let expected = 5 + pyhost_core::lang::exceptions::names().len();
        assert_eq!(rt.classes().len(), expected);
        assert_eq!(rt.builtins().len(), expected);
    }

    #[test]
    fn test_import_error_is_catchable_by_ancestor() {
        let rt = Runtime::new().unwrap();
        let standard_error = rt.builtins().class("StandardError").unwrap().clone();
        let caught = rt.catch(rt.import_error("nope"), &standard_error).unwrap();
        assert_eq!(caught.class().name(), "ImportError");
        assert_eq!(caught.text(), "Could not import \"nope\".");
    }

    #[test]
    fn test_catch_rejects_unrelated_class() {
        let rt = Runtime::new().unwrap();
        let lookup = rt.builtins().class("LookupError").unwrap().clone();
        let err = rt.catch(rt.import_error("nope"), &lookup).unwrap_err();
        assert_eq!(err.class_name(), Some("ImportError"));
    }

    #[test]
    fn test_catch_normalizes_host_reference_failure() {
        let rt = Runtime::new().unwrap();
        let name_error = rt.builtins().class("NameError").unwrap().clone();
        let raised = Raised::from(HostFailure::Reference {
            message: "z is not defined".into(),
        });
        let caught = rt.catch(raised, &name_error).unwrap();
        assert_eq!(caught.text(), "ReferenceError: z is not defined");
    }

    #[test]
    fn test_class_of_functions_and_methods() {
        let rt = Runtime::new().unwrap();
        let f = Function::new("f", |_| Ok(Value::None));
        assert_eq!(rt.class_of(&Value::Function(f.clone())).unwrap().name(), "function");
        assert_eq!(rt.class_of(&rt.bind(Value::None, f)).unwrap().name(), "method");
        assert!(rt.class_of(&Value::Int(1)).is_none());
    }

    #[test]
    fn test_raise_runtime_error_mapping() {
        let rt = Runtime::new().unwrap();
        let raised = rt.raise_runtime_error(RuntimeError::MissingClass { value: "int".into() });
        assert_eq!(raised.class_name(), Some("AttributeError"));

        let raised = rt.raise_runtime_error(RuntimeError::DuplicateDefinition { name: "X".into() });
        assert!(matches!(raised, Raised::Host(HostFailure::Other(_))));
    }

    #[test]
    fn test_custom_qualifier_reaches_exception_text() {
        let rt = Runtime::bootstrap(RuntimeConfig::new().with_qualifier("app")).unwrap();
        let raised = rt.import_error("x");
        assert_eq!(raised.to_string(), "app: ImportError: Could not import \"x\".");
    }

    #[test]
    fn test_load_shares_the_instance_with_import() {
        let rt = Runtime::new().unwrap();
        rt.register_module("pkg.mod.x", |ctx: &ExecutionContext<'_>| Ok(ctx.new_module()));

        let resolution = rt.resolve("x", "pkg.mod").unwrap();
        assert_eq!(resolution.fq_name, "pkg.mod.x");
        let loaded = rt.load(&resolution).unwrap();
        let imported = rt.import("x", "pkg.mod").unwrap();
        assert!(Rc::ptr_eq(&loaded, &imported));
        assert_eq!(rt.cache().len(), 1);
    }
}
