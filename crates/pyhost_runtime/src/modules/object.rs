//! Module instances.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use pyhost_core::lang::conventions::NAME_ATTR;

use crate::class::ClassRef;
use crate::value::Value;

pub type ModuleRef = Rc<ModuleObject>;

/// A module instance: its names plus a mutable attribute namespace.
pub struct ModuleObject {
    fq_name: String,
    declared_name: String,
    file: Option<String>,
    class: Option<ClassRef>,
    attrs: RefCell<HashMap<String, Value>>,
}

impl ModuleObject {
    pub fn new(fq_name: impl Into<String>, declared_name: impl Into<String>) -> Self {
        Self {
            fq_name: fq_name.into(),
            declared_name: declared_name.into(),
            file: None,
            class: None,
            attrs: RefCell::new(HashMap::new()),
        }
    }

    /// Label of the source the module was compiled from.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_class(mut self, class: ClassRef) -> Self {
        self.class = Some(class);
        self
    }

    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    /// The module's `__name__`; differs from [`fq_name`](Self::fq_name) for the entry module.
    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn class(&self) -> Option<&ClassRef> {
        self.class.as_ref()
    }

    /// Read an attribute. `__name__` always reflects the declared name.
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        if name == NAME_ATTR {
            return Some(Value::from(self.declared_name.as_str()));
        }
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

impl fmt::Debug for ModuleObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleObject")
            .field("fq_name", &self.fq_name)
            .field("declared_name", &self.declared_name)
            .field("file", &self.file)
            .field("attrs", &self.attr_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_attr_is_declared_name() {
        let module = ModuleObject::new("app.main", "__main__");
        assert_eq!(module.get_attr("__name__").unwrap().as_str(), Some("__main__"));
        assert_eq!(module.fq_name(), "app.main");
    }

    #[test]
    fn test_attrs_round_trip() {
        let module = ModuleObject::new("m", "m").with_file("m.py");
        module.set_attr("x", Value::Int(1));
        assert_eq!(module.get_attr("x").unwrap().as_int(), Some(1));
        assert!(module.get_attr("y").is_none());
        assert_eq!(module.file(), Some("m.py"));
        assert_eq!(module.attr_names(), ["x"]);
    }
}
