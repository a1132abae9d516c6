//! Bound methods.
//!
//! A [`BoundMethod`] is produced whenever a function owned by a class is read off an instance. It is not
//! registered or cached anywhere; it lives as long as something references it.

use crate::errors::{Raised, RuntimeError};
use crate::value::{Function, RuntimeClass, Value};

/// A receiver paired with a callable. Both are fixed at construction.
#[derive(Debug, Clone)]
pub struct BoundMethod {
    receiver: Value,
    callable: Function,
}

impl BoundMethod {
    /// Pair `receiver` with `callable`. Arity is not checked until the method is invoked.
    pub fn bind(receiver: Value, callable: Function) -> Self {
        Self { receiver, callable }
    }

    pub fn receiver(&self) -> &Value {
        &self.receiver
    }

    pub fn callable(&self) -> &Function {
        &self.callable
    }

    /// Call the function with the receiver prepended to `args`.
    ///
    /// Whatever the function returns or raises is passed through unchanged.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, Raised> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(self.receiver.clone());
        full.extend_from_slice(args);
        self.callable.call(&full)
    }

    /// Human-readable label: `<bound method NAME of class CLASSNAME>`.
    ///
    /// ## Errors
    /// - [`RuntimeError::MissingClass`] if the receiver carries no class object.
    pub fn describe(&self) -> Result<String, RuntimeError> {
        let class = self
            .receiver
            .runtime_class()
            .ok_or_else(|| RuntimeError::MissingClass {
                value: self.receiver.type_name(),
            })?;
        Ok(format!(
            "<bound method {} of class {}>",
            self.callable.name(),
            class.name()
        ))
    }
}
