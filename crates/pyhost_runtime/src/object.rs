//! Plain instances of registry classes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::class::ClassRef;
use crate::value::Value;

pub type InstanceRef = Rc<Instance>;

/// An instance: its class plus a mutable attribute table.
pub struct Instance {
    class: ClassRef,
    attrs: RefCell<HashMap<String, Value>>,
}

impl Instance {
    pub fn new(class: ClassRef) -> Self {
        Self {
            class,
            attrs: RefCell::new(HashMap::new()),
        }
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// An attribute set on the instance itself (class members are not consulted).
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        self.attrs.borrow().get(name).cloned()
    }

    pub fn set_attr(&self, name: impl Into<String>, value: Value) {
        self.attrs.borrow_mut().insert(name.into(), value);
    }

    pub fn attr_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attrs.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("attrs", &self.attr_names())
            .finish()
    }
}
