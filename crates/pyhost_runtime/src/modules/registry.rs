//! Fully-qualified module name → factory.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::Raised;
use crate::modules::context::ExecutionContext;
use crate::modules::object::ModuleRef;
use crate::modules::resolver::{self, Resolution};

/// Produces a module instance for an execution context.
pub type ModuleFactory = Rc<dyn Fn(&ExecutionContext<'_>) -> Result<ModuleRef, Raised>>;

/// Registered module factories.
///
/// Registration is permissive: registering a name twice replaces the earlier factory (logged at `warn`).
#[derive(Default)]
pub struct ModuleRegistry {
    factories: RefCell<HashMap<String, ModuleFactory>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `fq_name`.
    ///
    /// ## Returns
    /// - (`bool`): `true` if an earlier factory was replaced.
    pub fn register<F>(&self, fq_name: impl Into<String>, factory: F) -> bool
    where
        F: Fn(&ExecutionContext<'_>) -> Result<ModuleRef, Raised> + 'static,
    {
        let fq_name = fq_name.into();
        let replaced = self
            .factories
            .borrow_mut()
            .insert(fq_name.clone(), Rc::new(factory))
            .is_some();
        if replaced {
            tracing::warn!(module = %fq_name, "module factory re-registered; previous factory replaced");
        } else {
            tracing::debug!(module = %fq_name, "registered module factory");
        }
        replaced
    }

    pub fn contains(&self, fq_name: &str) -> bool {
        self.factories.borrow().contains_key(fq_name)
    }

    /// The factory registered under `fq_name`. The registry is not borrowed while the factory runs.
    pub fn factory(&self, fq_name: &str) -> Option<ModuleFactory> {
        self.factories.borrow().get(fq_name).cloned()
    }

    /// Resolve `requested`, as imported from `caller`, against the registered names.
    pub fn resolve(&self, requested: &str, caller: &str) -> Option<Resolution> {
        resolver::resolve_name(requested, caller, |name| self.contains(name))
    }

    pub fn len(&self) -> usize {
        self.factories.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.borrow().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::object::ModuleObject;

    fn empty(ctx: &ExecutionContext<'_>) -> Result<ModuleRef, Raised> {
        Ok(Rc::new(ModuleObject::new(ctx.fq_name(), ctx.declared_name())))
    }

    #[test]
    fn test_register_and_contains() {
        let registry = ModuleRegistry::new();
        assert!(!registry.register("pkg.mod", empty));
        assert!(registry.contains("pkg.mod"));
        assert!(!registry.contains("pkg"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_overwrites() {
        let registry = ModuleRegistry::new();
        registry.register("m", empty);
        let first = registry.factory("m").unwrap();

        assert!(registry.register("m", empty));
        let second = registry.factory("m").unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(registry.names(), ["m"]);
    }
}
