//! Exception taxonomy and exception values.
//!
//! The taxonomy is built once, at bootstrap, by walking a declarative forest of [`ClassNode`]s depth-first in
//! pre-order. Every node becomes a class (through [`ClassRegistry::define`], like any other class) and is
//! installed into the builtin namespace under its own name. Because walk order is fixed by the data, two
//! registries built from the same forest end up with identical names and ancestry.
//!
//! Exception instances carry a single `message` payload, stored exactly as given. It is only turned into
//! text when a textual form is requested.
//!
//! ## Notes
//! - Building the same forest twice into one registry fails with [`RuntimeError::DuplicateDefinition`].
//! - [`Exceptions::exceptionify`] is the seam where host-level failures enter the managed taxonomy.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use pyhost_core::lang::exceptions::{ExceptionNode, NAME_ERROR};

use crate::builtins::Builtins;
use crate::class::{ClassObject, ClassRef, ClassRegistry};
use crate::errors::{HostFailure, Raised, RuntimeError};
use crate::value::Value;

/// Shared handle to an exception instance.
pub type ExceptionRef = Rc<ExceptionObject>;

/// An instance of a class beneath `BaseException`.
pub struct ExceptionObject {
    class: ClassRef,
    message: Value,
    qualifier: Rc<str>,
}

impl ExceptionObject {
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// The payload, exactly as passed at construction.
    pub fn message(&self) -> &Value {
        &self.message
    }

    pub fn is_instance_of(&self, class: &ClassObject) -> bool {
        self.class.is_subclass_of(class)
    }

    /// `str(exc)`: the textual form of the message alone.
    pub fn text(&self) -> String {
        self.message.to_string()
    }
}

/// Full textual form: `qualifier: ClassName: message`.
impl fmt::Display for ExceptionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.qualifier, self.class.name(), self.message)
    }
}

impl fmt::Debug for ExceptionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionObject")
            .field("class", &self.class.name())
            .field("message", &self.message)
            .finish()
    }
}

/// One node of a declarative class forest: a name and its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    pub name: String,
    pub children: Vec<ClassNode>,
}

impl ClassNode {
    pub fn new(name: impl Into<String>, children: Vec<ClassNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn leaf(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Convert a `const` forest table into owned nodes.
    pub fn from_static(forest: &[ExceptionNode]) -> Vec<ClassNode> {
        forest
            .iter()
            .map(|node| ClassNode::new(node.name, Self::from_static(node.children)))
            .collect()
    }

    /// Number of nodes in this subtree, itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ClassNode::count).sum::<usize>()
    }
}

/// Build `forest` beneath `base`, installing every new class into `builtins`.
///
/// ## Parameters
/// - `classes`: the registry that will own the new classes.
/// - `base`: the pre-existing class every forest root is parented to.
/// - `forest`: the declarative tree, walked depth-first in pre-order.
/// - `builtins`: receives one entry per created class, keyed by class name.
///
/// ## Returns
/// - (`Vec<ClassRef>`): the created classes in creation order.
///
/// ## Errors
/// - [`RuntimeError::DuplicateDefinition`] if a name is already registered (including a repeated name inside
///   `forest`). Classes created before the failure stay registered.
#[tracing::instrument(skip_all, fields(base = base.name(), roots = forest.len()))]
pub fn build_taxonomy(
    classes: &ClassRegistry,
    base: &ClassRef,
    forest: &[ClassNode],
    builtins: &mut Builtins,
) -> Result<Vec<ClassRef>, RuntimeError> {
    let mut created = Vec::new();
    build_level(classes, base, forest, builtins, &mut created)?;
    tracing::debug!(count = created.len(), "built exception taxonomy");
    Ok(created)
}

fn build_level(
    classes: &ClassRegistry,
    parent: &ClassRef,
    nodes: &[ClassNode],
    builtins: &mut Builtins,
    created: &mut Vec<ClassRef>,
) -> Result<(), RuntimeError> {
    for node in nodes {
        let class = classes.define(&node.name, Some(parent))?;
        builtins.install_class(&class);
        created.push(class.clone());
        build_level(classes, &class, &node.children, builtins, created)?;
    }
    Ok(())
}

/// The built taxonomy: constructs exception instances and normalizes host failures.
#[derive(Debug)]
pub struct Exceptions {
    base: ClassRef,
    qualifier: Rc<str>,
    by_name: HashMap<String, ClassRef>,
}

impl Exceptions {
    /// Index `base` and `classes` by name.
    pub fn new(base: ClassRef, qualifier: &str, classes: impl IntoIterator<Item = ClassRef>) -> Self {
        let mut by_name: HashMap<String, ClassRef> = classes
            .into_iter()
            .map(|class| (class.name().to_string(), class))
            .collect();
        by_name.insert(base.name().to_string(), base.clone());

        Self {
            base,
            qualifier: Rc::from(qualifier),
            by_name,
        }
    }

    /// The ultimate ancestor of every exception class.
    pub fn base(&self) -> &ClassRef {
        &self.base
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn class(&self, name: &str) -> Option<&ClassRef> {
        self.by_name.get(name)
    }

    pub fn is_exception_class(&self, class: &ClassObject) -> bool {
        class.is_subclass_of(&self.base)
    }

    /// Construct an instance of `class`.
    ///
    /// `message` is the first positional argument, stored verbatim, or the empty string when `args` is empty.
    ///
    /// ## Errors
    /// - [`RuntimeError::NotAnException`] if `class` does not descend from the base exception.
    pub fn instantiate(&self, class: &ClassRef, args: &[Value]) -> Result<ExceptionRef, RuntimeError> {
        if !self.is_exception_class(class) {
            return Err(RuntimeError::NotAnException {
                name: class.name().to_string(),
            });
        }
        let message = args.first().cloned().unwrap_or_else(|| Value::from(""));
        Ok(self.make(class.clone(), message))
    }

    /// Construct an instance of the class registered as `name`.
    ///
    /// Falls back to the base exception class when `name` is not part of the taxonomy.
    pub fn new_exception(&self, name: &str, message: impl Into<Value>) -> ExceptionRef {
        let class = self.by_name.get(name).unwrap_or(&self.base).clone();
        self.make(class, message.into())
    }

    /// [`new_exception`](Self::new_exception), wrapped for propagation.
    pub fn raise(&self, name: &str, message: impl Into<Value>) -> Raised {
        Raised::Exception(self.new_exception(name, message))
    }

    /// Map a host-level failure onto the managed taxonomy.
    ///
    /// A host name-resolution failure becomes a `NameError` whose message is the failure's text. Managed
    /// exceptions and every other host failure pass through unchanged.
    pub fn exceptionify(&self, raised: Raised) -> Raised {
        match raised {
            Raised::Host(failure @ HostFailure::Reference { .. }) => self.raise(NAME_ERROR, failure.to_string()),
            other => other,
        }
    }

    fn make(&self, class: ClassRef, message: Value) -> ExceptionRef {
        Rc::new(ExceptionObject {
            class,
            message,
            qualifier: self.qualifier.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pyhost_core::lang::conventions::BASE_EXCEPTION;
    use pyhost_core::lang::exceptions::BUILTIN_EXCEPTIONS;

    use super::*;

    fn builtin_taxonomy() -> (ClassRegistry, Builtins, Exceptions) {
        let classes = ClassRegistry::new();
        let base = classes.define(BASE_EXCEPTION, None).unwrap();
        let mut builtins = Builtins::new();
        builtins.install_class(&base);
        let forest = ClassNode::from_static(BUILTIN_EXCEPTIONS);
        let created = build_taxonomy(&classes, &base, &forest, &mut builtins).unwrap();
        let exceptions = Exceptions::new(base, "pyhost", created);
        (classes, builtins, exceptions)
    }

    #[test]
    fn test_build_installs_every_class() {
        let (classes, builtins, _) = builtin_taxonomy();
        for name in pyhost_core::lang::exceptions::names() {
            let installed = builtins.class(name).unwrap();
            assert!(Rc::ptr_eq(installed, &classes.get(name).unwrap()));
        }
    }

    #[test]
    fn test_build_links_ancestry() {
        let (classes, _, _) = builtin_taxonomy();
        let zero = classes.get("ZeroDivisionError").unwrap();
        assert_eq!(
            zero.ancestry_names(),
            [
                "ZeroDivisionError",
                "ArithmeticError",
                "StandardError",
                "Exception",
                "BaseException",
                "object"
            ]
        );
    }

    #[test]
    fn test_build_twice_is_duplicate_definition() {
        let (classes, mut builtins, exceptions) = builtin_taxonomy();
        let forest = ClassNode::from_static(BUILTIN_EXCEPTIONS);
        let err = build_taxonomy(&classes, exceptions.base(), &forest, &mut builtins).unwrap_err();
        assert_eq!(err, RuntimeError::DuplicateDefinition { name: "SystemExit".into() });
    }

    #[test]
    fn test_repeated_name_inside_forest_fails() {
        let classes = ClassRegistry::new();
        let base = classes.define("Base", None).unwrap();
        let forest = vec![ClassNode::new("A", vec![ClassNode::leaf("B")]), ClassNode::leaf("B")];
        let err = build_taxonomy(&classes, &base, &forest, &mut Builtins::new()).unwrap_err();
        assert_eq!(err, RuntimeError::DuplicateDefinition { name: "B".into() });
    }

    #[test]
    fn test_instantiate_defaults_message_to_empty() {
        let (_, _, exceptions) = builtin_taxonomy();
        let key_error = exceptions.class("KeyError").unwrap().clone();
        let exc = exceptions.instantiate(&key_error, &[]).unwrap();
        assert_eq!(exc.message().as_str(), Some(""));
        assert_eq!(exc.to_string(), "pyhost: KeyError: ");
    }

    #[test]
    fn test_instantiate_stores_message_verbatim() {
        let (_, _, exceptions) = builtin_taxonomy();
        let value_error = exceptions.class("ValueError").unwrap().clone();
        let exc = exceptions
            .instantiate(&value_error, &[Value::Int(42), Value::from("ignored")])
            .unwrap();
        assert_eq!(exc.message().as_int(), Some(42));
        assert_eq!(exc.text(), "42");
        assert_eq!(exc.to_string(), "pyhost: ValueError: 42");
    }

    #[test]
    fn test_instantiate_non_exception_class_fails() {
        let (classes, _, exceptions) = builtin_taxonomy();
        let plain = classes.define("Plain", None).unwrap();
        assert_eq!(
            exceptions.instantiate(&plain, &[]).unwrap_err(),
            RuntimeError::NotAnException { name: "Plain".into() }
        );
    }

    #[test]
    fn test_new_exception_unknown_name_falls_back_to_base() {
        let (_, _, exceptions) = builtin_taxonomy();
        let exc = exceptions.new_exception("NoSuchError", "m");
        assert_eq!(exc.class().name(), BASE_EXCEPTION);
    }

    #[test]
    fn test_exceptionify_maps_reference_failure_to_name_error() {
        let (_, _, exceptions) = builtin_taxonomy();
        let raised = Raised::from(HostFailure::Reference {
            message: "x is not defined".into(),
        });
        let normalized = exceptionify_name(&exceptions, raised);
        assert_eq!(normalized.as_deref(), Some("NameError"));
    }

    #[test]
    fn test_exceptionify_passes_managed_exceptions_through() {
        let (_, _, exceptions) = builtin_taxonomy();
        let original = exceptions.new_exception("KeyError", "k");
        let out = exceptions.exceptionify(Raised::Exception(original.clone()));
        assert!(Rc::ptr_eq(out.exception().unwrap(), &original));
    }

    #[test]
    fn test_exceptionify_passes_other_host_failures_through() {
        let (_, _, exceptions) = builtin_taxonomy();
        let out = exceptions.exceptionify(Raised::from(HostFailure::Other("disk".into())));
        assert!(matches!(out, Raised::Host(HostFailure::Other(ref m)) if m == "disk"));
    }

    #[test]
    fn test_name_error_message_carries_host_text() {
        let (_, _, exceptions) = builtin_taxonomy();
        let out = exceptions.exceptionify(Raised::from(HostFailure::Reference {
            message: "y is not defined".into(),
        }));
        assert_eq!(out.exception().unwrap().text(), "ReferenceError: y is not defined");
    }

    fn exceptionify_name(exceptions: &Exceptions, raised: Raised) -> Option<String> {
        exceptions.exceptionify(raised).class_name().map(str::to_string)
    }

    #[test]
    fn test_class_node_from_static_preserves_shape() {
        let forest = ClassNode::from_static(BUILTIN_EXCEPTIONS);
        let total: usize = forest.iter().map(ClassNode::count).sum();
        assert_eq!(total, pyhost_core::lang::exceptions::names().len());
        assert_eq!(forest[3].name, "Exception");
    }
}
