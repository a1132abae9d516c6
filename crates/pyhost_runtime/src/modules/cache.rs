//! At-most-once module instantiation.
//!
//! Once an import of a fully-qualified name has completed, its instance is fixed for every later
//! resolution and the factory is never consulted again for that name.
//!
//! ## Re-entrancy
//! A factory that (directly or through other modules) imports its own name runs before anything is cached.
//! With [`CyclicImportPolicy::Reenter`] the nested import re-invokes the factory, so module side effects
//! can happen twice. The nested run is cached first and then overwritten when the outer run completes:
//! the outer importer and all later imports see the outer instance, and only the nested importer holds a
//! separate one. With [`CyclicImportPolicy::FailFast`] the nested import raises `ImportError` instead.

use std::cell::RefCell;
use std::collections::HashMap;

use pyhost_core::lang::exceptions::IMPORT_ERROR;

use crate::config::CyclicImportPolicy;
use crate::errors::Raised;
use crate::modules::context::ExecutionContext;
use crate::modules::object::ModuleRef;
use crate::modules::registry::ModuleRegistry;

/// Fully-qualified name → module instance.
#[derive(Default)]
pub struct ModuleCache {
    modules: RefCell<HashMap<String, ModuleRef>>,
    /// Names whose factory is currently running, with nesting depth.
    loading: RefCell<HashMap<String, usize>>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fq_name: &str) -> Option<ModuleRef> {
        self.modules.borrow().get(fq_name).cloned()
    }

    pub fn contains(&self, fq_name: &str) -> bool {
        self.modules.borrow().contains_key(fq_name)
    }

    /// Whether a factory for `fq_name` is running right now.
    pub fn is_loading(&self, fq_name: &str) -> bool {
        self.loading.borrow().contains_key(fq_name)
    }

    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.borrow().is_empty()
    }

    /// Cached names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Return the cached instance for `ctx.fq_name()`, instantiating it from `registry` on first use.
    ///
    /// ## Errors
    /// - `ImportError` if the name has no registered factory, or if it is re-entered under
    ///   [`CyclicImportPolicy::FailFast`].
    /// - Anything the factory raises, unchanged. Nothing is cached in that case.
    pub fn get_or_create(&self, registry: &ModuleRegistry, ctx: &ExecutionContext<'_>) -> Result<ModuleRef, Raised> {
        let fq_name = ctx.fq_name();

        if let Some(module) = self.get(fq_name) {
            tracing::debug!(module = fq_name, "module cache hit");
            return Ok(module);
        }

        let exceptions = ctx.exceptions();
        let factory = registry
            .factory(fq_name)
            .ok_or_else(|| exceptions.raise(IMPORT_ERROR, format!("Could not import \"{fq_name}\".")))?;

        if self.is_loading(fq_name) {
            match ctx.runtime().config().cyclic_imports {
                CyclicImportPolicy::FailFast => {
                    return Err(exceptions.raise(
                        IMPORT_ERROR,
                        format!("Cyclic import of \"{fq_name}\" while it is still initializing."),
                    ));
                }
                CyclicImportPolicy::Reenter => {
                    tracing::warn!(module = fq_name, "re-entrant import; module factory runs again");
                }
            }
        }

        tracing::debug!(module = fq_name, "module cache miss; running factory");
        let module = {
            let _loading = LoadingGuard::enter(&self.loading, fq_name);
            factory(ctx)?
        };

        // A re-entrant run may have cached its own instance already; the outer run replaces it.
        self.modules.borrow_mut().insert(fq_name.to_string(), module.clone());
        Ok(module)
    }
}

/// Marks a name as loading for the guard's lifetime, including on early return.
struct LoadingGuard<'a> {
    loading: &'a RefCell<HashMap<String, usize>>,
    fq_name: String,
}

impl<'a> LoadingGuard<'a> {
    fn enter(loading: &'a RefCell<HashMap<String, usize>>, fq_name: &str) -> Self {
        *loading.borrow_mut().entry(fq_name.to_string()).or_insert(0) += 1;
        Self {
            loading,
            fq_name: fq_name.to_string(),
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut loading = self.loading.borrow_mut();
        if let Some(depth) = loading.get_mut(&self.fq_name) {
            *depth -= 1;
            if *depth == 0 {
                loading.remove(&self.fq_name);
            }
        }
    }
}
