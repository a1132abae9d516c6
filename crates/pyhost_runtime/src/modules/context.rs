//! The record handed to a module factory.

use std::rc::Rc;

use pyhost_core::lang::conventions::MAIN_MODULE_NAME;

use crate::builtins::Builtins;
use crate::class::ClassRegistry;
use crate::errors::Raised;
use crate::exceptions::Exceptions;
use crate::modules::object::{ModuleObject, ModuleRef};
use crate::runtime::Runtime;

/// What a factory knows about the module it is producing.
///
/// `fq_name` is the registry key; `declared_name` is the module's `__name__`, which differs for the entry
/// module (usually `__main__`).
pub struct ExecutionContext<'rt> {
    fq_name: String,
    declared_name: String,
    runtime: &'rt Runtime,
}

impl<'rt> ExecutionContext<'rt> {
    pub fn new(fq_name: impl Into<String>, declared_name: impl Into<String>, runtime: &'rt Runtime) -> Self {
        Self {
            fq_name: fq_name.into(),
            declared_name: declared_name.into(),
            runtime,
        }
    }

    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    /// Whether the module is being run as the program entry point under `__main__`.
    pub fn is_main(&self) -> bool {
        self.declared_name == MAIN_MODULE_NAME
    }

    pub fn builtins(&self) -> &'rt Builtins {
        self.runtime.builtins()
    }

    pub fn classes(&self) -> &'rt ClassRegistry {
        self.runtime.classes()
    }

    pub fn exceptions(&self) -> &'rt Exceptions {
        self.runtime.exceptions()
    }

    pub fn runtime(&self) -> &'rt Runtime {
        self.runtime
    }

    /// Import `requested` on behalf of this module.
    pub fn import(&self, requested: &str) -> Result<ModuleRef, Raised> {
        self.runtime.import(requested, &self.fq_name)
    }

    /// A fresh, empty module instance named after this context.
    pub fn new_module(&self) -> ModuleRef {
        Rc::new(
            ModuleObject::new(self.fq_name.as_str(), self.declared_name.as_str())
                .with_class(self.runtime.core_classes().module.clone()),
        )
    }
}
