//! The builtin namespace.
//!
//! A flat mapping from class name to class object, consulted by native `raise` / `except` constructs. Keys are
//! the class names themselves.

use std::collections::HashMap;

use crate::class::ClassRef;
use crate::value::Value;

/// Flat name → value mapping shared with every module's execution context.
#[derive(Debug, Default)]
pub struct Builtins {
    entries: HashMap<String, Value>,
}

impl Builtins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `value` under `key`, returning the value it replaced.
    pub fn install(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Install a class under its own name.
    pub fn install_class(&mut self, class: &ClassRef) -> Option<Value> {
        self.install(class.name(), Value::Class(class.clone()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// The class installed under `key`, if the entry is a class.
    pub fn class(&self, key: &str) -> Option<&ClassRef> {
        match self.entries.get(key) {
            Some(Value::Class(class)) => Some(class),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Installed keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
