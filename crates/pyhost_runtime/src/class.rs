//! Class objects and the class registry.
//!
//! [`ClassRegistry::define`] is the single subclassing primitive: exceptions, `method`, `module` and any
//! ad-hoc class are all created through it. The registry has no notion of what a class is *for*.
//!
//! ## Invariants
//! - Names are unique within a registry; a second `define` of the same name fails with
//!   [`RuntimeError::DuplicateDefinition`].
//! - A class is only ever created with a parent that already belongs to the same registry, so every parent
//!   chain is finite, acyclic and ends at the registry's root (`object`).
//! - Class objects are never removed; members are fixed at definition time.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::rc::Rc;

use pyhost_core::lang::conventions::OBJECT_CLASS;

use crate::errors::RuntimeError;
use crate::value::Value;

/// Shared handle to a registry-owned class object.
pub type ClassRef = Rc<ClassObject>;

/// A named class with a parent link and a table of locally defined members.
pub struct ClassObject {
    id: usize,
    name: Rc<str>,
    parent: Option<ClassRef>,
    members: HashMap<String, Value>,
}

impl ClassObject {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation index within the owning registry (the root is `0`).
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    /// A member defined directly on this class.
    pub fn member(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    /// Names of locally defined members, sorted.
    pub fn member_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.members.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate from this class up to the root, this class first.
    pub fn ancestors(&self) -> impl Iterator<Item = &ClassObject> {
        std::iter::successors(Some(self), |class| class.parent.as_deref())
    }

    /// Class names from this class up to the root.
    pub fn ancestry_names(&self) -> Vec<&str> {
        self.ancestors().map(ClassObject::name).collect()
    }

    /// Look a member up through the ancestry, nearest definition first.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.ancestors().find_map(|class| class.members.get(name))
    }

    /// Whether `self` is `other` or one of its descendants.
    pub fn is_subclass_of(&self, other: &ClassObject) -> bool {
        self.ancestors().any(|class| std::ptr::eq(class, other))
    }
}

impl fmt::Debug for ClassObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("members", &self.member_names())
            .finish()
    }
}

/// Creates and owns class objects, one per name.
pub struct ClassRegistry {
    root: ClassRef,
    classes: RefCell<Vec<ClassRef>>,
    by_name: RefCell<HashMap<Rc<str>, ClassRef>>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create a registry holding only the implicit root class `object`.
    pub fn new() -> Self {
        let root = Rc::new(ClassObject {
            id: 0,
            name: Rc::from(OBJECT_CLASS),
            parent: None,
            members: HashMap::new(),
        });
        let by_name = HashMap::from([(root.name.clone(), root.clone())]);

        Self {
            root: root.clone(),
            classes: RefCell::new(vec![root]),
            by_name: RefCell::new(by_name),
        }
    }

    /// The implicit absolute root (`object`).
    pub fn root(&self) -> &ClassRef {
        &self.root
    }

    /// Define a class with no members. A `None` parent links the class to the root.
    ///
    /// ## Errors
    /// - [`RuntimeError::DuplicateDefinition`] if `name` is already registered.
    /// - [`RuntimeError::UnknownClass`] if `parent` does not belong to this registry.
    pub fn define(&self, name: &str, parent: Option<&ClassRef>) -> Result<ClassRef, RuntimeError> {
        self.define_with_members(name, parent, std::iter::empty())
    }

    /// Define a class together with its member table.
    pub fn define_with_members<I>(
        &self,
        name: &str,
        parent: Option<&ClassRef>,
        members: I,
    ) -> Result<ClassRef, RuntimeError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if self.by_name.borrow().contains_key(name) {
            return Err(RuntimeError::DuplicateDefinition { name: name.to_string() });
        }

        let parent = match parent {
            Some(parent) if self.owns(parent) => parent.clone(),
            Some(parent) => {
                return Err(RuntimeError::UnknownClass {
                    name: parent.name().to_string(),
                });
            }
            None => self.root.clone(),
        };

        let mut classes = self.classes.borrow_mut();
        let class = Rc::new(ClassObject {
            id: classes.len(),
            name: Rc::from(name),
            parent: Some(parent),
            members: members.into_iter().collect(),
        });
        classes.push(class.clone());
        self.by_name.borrow_mut().insert(class.name.clone(), class.clone());

        tracing::debug!(class = name, parent = class.parent().map(|p| p.name()), "defined class");
        Ok(class)
    }

    /// Look a class up by name.
    pub fn get(&self, name: &str) -> Option<ClassRef> {
        self.by_name.borrow().get(name).cloned()
    }

    /// Look a class up by name, failing with [`RuntimeError::UnknownClass`].
    pub fn require(&self, name: &str) -> Result<ClassRef, RuntimeError> {
        self.get(name)
            .ok_or_else(|| RuntimeError::UnknownClass { name: name.to_string() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.borrow().contains_key(name)
    }

    /// Whether `class` is the object registered under its name here.
    pub fn owns(&self, class: &ClassRef) -> bool {
        self.by_name
            .borrow()
            .get(class.name())
            .is_some_and(|registered| Rc::ptr_eq(registered, class))
    }

    /// Number of classes, the root included.
    pub fn len(&self) -> usize {
        self.classes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.borrow().is_empty()
    }

    /// All classes in creation order.
    pub fn classes(&self) -> Vec<ClassRef> {
        self.classes.borrow().clone()
    }

    /// Direct subclasses of `class`, in creation order.
    pub fn children_of(&self, class: &ClassObject) -> Vec<ClassRef> {
        self.classes
            .borrow()
            .iter()
            .filter(|c| c.parent().is_some_and(|p| std::ptr::eq(&**p, class)))
            .cloned()
            .collect()
    }

    /// Render the subtree under `class` as an indented tree, two spaces per level.
    pub fn render_tree(&self, class: &ClassObject) -> String {
        let mut out = String::new();
        self.render_into(&mut out, class, 0);
        out
    }

    fn render_into(&self, out: &mut String, class: &ClassObject, depth: usize) {
        // Writing to String cannot fail.
        let _ = writeln!(out, "{:indent$}{}", "", class.name(), indent = depth * 2);
        for child in self.children_of(class) {
            self.render_into(out, &child, depth + 1);
        }
    }
}
