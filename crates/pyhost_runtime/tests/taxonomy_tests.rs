//! Exception taxonomy construction: determinism, ancestry and message handling.

use proptest::prelude::*;
use pyhost_core::lang::conventions::BASE_EXCEPTION;
use pyhost_core::lang::exceptions;
use pyhost_runtime::{Builtins, ClassNode, ClassRegistry, Runtime, RuntimeError, Value, build_taxonomy};

// =============================================================================
// Builtin forest
// =============================================================================

#[test]
fn builtin_ancestry_matches_declared_forest() {
    let rt = Runtime::new().unwrap();
    for name in exceptions::names() {
        let class = rt.builtins().class(name).unwrap();
        let mut expected: Vec<&str> = exceptions::ancestry(name).collect();
        expected.extend([BASE_EXCEPTION, "object"]);
        assert_eq!(class.ancestry_names(), expected, "ancestry of {name}");
    }
}

#[test]
fn builtin_classes_are_created_in_pre_order() {
    let rt = Runtime::new().unwrap();
    let base_id = rt.exceptions().base().id();
    let ids: Vec<usize> = exceptions::names()
        .into_iter()
        .map(|name| rt.builtins().class(name).unwrap().id())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert!(ids[0] > base_id);
}

#[test]
fn rendered_lookup_error_subtree() {
    let rt = Runtime::new().unwrap();
    let lookup = rt.builtins().class("LookupError").unwrap();
    insta::assert_snapshot!(rt.classes().render_tree(lookup), @r"
    LookupError
      IndexError
      KeyError
    ");
}

#[test]
fn rendered_environment_error_subtree() {
    let rt = Runtime::new().unwrap();
    let env = rt.builtins().class("EnvironmentError").unwrap();
    insta::assert_snapshot!(rt.classes().render_tree(env), @r"
    EnvironmentError
      IOError
      OSError
    ");
}

#[test]
fn message_defaults_to_empty_string() {
    let rt = Runtime::new().unwrap();
    let class = rt.builtins().class("KeyError").unwrap().clone();
    let exc = rt.instantiate(&class, &[]).unwrap();
    let exc = exc.as_exception().unwrap();
    assert_eq!(exc.message().as_str(), Some(""));
    assert_eq!(exc.text(), "");
}

#[test]
fn message_is_stored_verbatim() {
    let rt = Runtime::new().unwrap();
    let class = rt.builtins().class("ValueError").unwrap().clone();
    let exc = rt.instantiate(&class, &[Value::Int(42), Value::from("ignored")]).unwrap();

    let message = rt.get_attribute(&exc, "message").unwrap();
    assert_eq!(message.as_int(), Some(42));
    assert_eq!(exc.as_exception().unwrap().to_string(), "pyhost: ValueError: 42");
}

#[test]
fn building_twice_into_one_registry_fails() {
    let classes = ClassRegistry::new();
    let base = classes.define(BASE_EXCEPTION, None).unwrap();
    let forest = ClassNode::from_static(exceptions::BUILTIN_EXCEPTIONS);
    let mut builtins = Builtins::new();

    build_taxonomy(&classes, &base, &forest, &mut builtins).unwrap();
    let err = build_taxonomy(&classes, &base, &forest, &mut builtins).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::DuplicateDefinition {
            name: "SystemExit".to_string()
        }
    );
}

#[test]
fn repeated_name_inside_forest_fails() {
    let classes = ClassRegistry::new();
    let base = classes.define(BASE_EXCEPTION, None).unwrap();
    let forest = vec![ClassNode::new("A", vec![ClassNode::leaf("B")]), ClassNode::leaf("B")];
    let err = build_taxonomy(&classes, &base, &forest, &mut Builtins::new()).unwrap_err();
    assert!(matches!(err, RuntimeError::DuplicateDefinition { name } if name == "B"));
}

// =============================================================================
// Arbitrary forests
// =============================================================================

/// Tree shape without names; names are assigned afterwards so they are unique.
#[derive(Debug, Clone)]
struct Shape(Vec<Shape>);

fn shape_strategy() -> impl Strategy<Value = Shape> {
    Just(Shape(Vec::new())).prop_recursive(4, 40, 4, |inner| prop::collection::vec(inner, 0..4).prop_map(Shape))
}

fn forest_strategy() -> impl Strategy<Value = Vec<ClassNode>> {
    prop::collection::vec(shape_strategy(), 1..4).prop_map(|shapes| {
        let mut next = 0;
        name_forest(&shapes, &mut next)
    })
}

fn name_forest(shapes: &[Shape], next: &mut usize) -> Vec<ClassNode> {
    shapes
        .iter()
        .map(|shape| {
            let name = format!("Err{next}");
            *next += 1;
            ClassNode::new(name, name_forest(&shape.0, next))
        })
        .collect()
}

fn pre_order(forest: &[ClassNode], out: &mut Vec<String>) {
    for node in forest {
        out.push(node.name.clone());
        pre_order(&node.children, out);
    }
}

fn build(forest: &[ClassNode]) -> (ClassRegistry, Builtins, Vec<String>) {
    let classes = ClassRegistry::new();
    let base = classes.define(BASE_EXCEPTION, None).unwrap();
    let mut builtins = Builtins::new();
    let created = build_taxonomy(&classes, &base, forest, &mut builtins).unwrap();
    let names = created.iter().map(|c| c.name().to_string()).collect();
    (classes, builtins, names)
}

proptest! {
    /// Two builds of the same forest agree on creation order and ancestry.
    #[test]
    fn taxonomy_build_is_deterministic(forest in forest_strategy()) {
        let (first_classes, first_builtins, first_order) = build(&forest);
        let (second_classes, second_builtins, second_order) = build(&forest);

        prop_assert_eq!(&first_order, &second_order);
        for name in &first_order {
            let a = first_builtins.class(name).unwrap();
            let b = second_builtins.class(name).unwrap();
            prop_assert_eq!(a.ancestry_names(), b.ancestry_names());
            prop_assert_eq!(a.id(), b.id());
        }

        let base_a = first_classes.get(BASE_EXCEPTION).unwrap();
        let base_b = second_classes.get(BASE_EXCEPTION).unwrap();
        prop_assert_eq!(first_classes.render_tree(&base_a), second_classes.render_tree(&base_b));
    }

    /// Classes are created in pre-order and every node is linked to its declared parent.
    #[test]
    fn taxonomy_follows_the_forest(forest in forest_strategy()) {
        let (_, builtins, order) = build(&forest);

        let mut expected = Vec::new();
        pre_order(&forest, &mut expected);
        prop_assert_eq!(&order, &expected);

        let total: usize = forest.iter().map(ClassNode::count).sum();
        prop_assert_eq!(builtins.len(), total);

        for root in &forest {
            let class = builtins.class(&root.name).unwrap();
            prop_assert_eq!(class.parent().map(|p| p.name()), Some(BASE_EXCEPTION));
        }
    }
}
