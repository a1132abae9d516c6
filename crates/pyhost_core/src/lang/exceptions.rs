//! Builtin exception forest (Python 2 style hierarchy).
//!
//! The forest is declared once, as data. Each [`ExceptionNode`] is a class name paired with its ordered
//! children; the roots of [`BUILTIN_EXCEPTIONS`] are direct subclasses of
//! [`BASE_EXCEPTION`](super::conventions::BASE_EXCEPTION), which is created separately by the runtime.
//!
//! ## Notes
//! - Order matters: the runtime builds classes in depth-first pre-order, so the table fixes class
//!   creation order as well as ancestry.
//! - Lookup via [`contains`] / [`parent_of`] is **case-sensitive**.
//!
//! ## Examples
//! ```rust
//! use pyhost_core::lang::exceptions;
//!
//! let chain: Vec<_> = exceptions::ancestry("TabError").collect();
//! assert_eq!(chain, ["TabError", "IndentationError", "SyntaxError", "StandardError", "Exception"]);
//! ```

use super::conventions::BASE_EXCEPTION;

/// One node of a declarative class forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionNode {
    pub name: &'static str,
    pub children: &'static [ExceptionNode],
}

const fn node(name: &'static str, children: &'static [ExceptionNode]) -> ExceptionNode {
    ExceptionNode { name, children }
}

const fn leaf(name: &'static str) -> ExceptionNode {
    ExceptionNode { name, children: &[] }
}

/// The builtin exception forest, rooted under `BaseException`.
pub const BUILTIN_EXCEPTIONS: &[ExceptionNode] = &[
    leaf("SystemExit"),
    leaf("KeyboardInterrupt"),
    leaf("GeneratorExit"),
    node(
        "Exception",
        &[
            leaf("StopIteration"),
            node(
                "StandardError",
                &[
                    leaf("BufferError"),
                    node(
                        "ArithmeticError",
                        &[
                            leaf("FloatingPointError"),
                            leaf("OverflowError"),
                            leaf("ZeroDivisionError"),
                        ],
                    ),
                    leaf("AssertionError"),
                    leaf("AttributeError"),
                    node("EnvironmentError", &[leaf("IOError"), leaf("OSError")]),
                    leaf("EOFError"),
                    leaf("ImportError"),
                    node("LookupError", &[leaf("IndexError"), leaf("KeyError")]),
                    leaf("MemoryError"),
                    node("NameError", &[leaf("UnboundLocalError")]),
                    leaf("ReferenceError"),
                    node("RuntimeError", &[leaf("NotImplementedError")]),
                    node("SyntaxError", &[node("IndentationError", &[leaf("TabError")])]),
                    leaf("SystemError"),
                    leaf("TypeError"),
                    node(
                        "ValueError",
                        &[node(
                            "UnicodeError",
                            &[
                                leaf("UnicodeDecodeError"),
                                leaf("UnicodeEncodeError"),
                                leaf("UnicodeTranslateError"),
                            ],
                        )],
                    ),
                ],
            ),
            node(
                "Warning",
                &[
                    leaf("DeprecationWarning"),
                    leaf("PendingDeprecationWarning"),
                    leaf("RuntimeWarning"),
                    leaf("SyntaxWarning"),
                    leaf("UserWarning"),
                    leaf("FutureWarning"),
                    leaf("ImportWarning"),
                    leaf("UnicodeWarning"),
                    leaf("BytesWarning"),
                ],
            ),
        ],
    ),
];

/// Well-known exception names the runtime raises itself.
pub const IMPORT_ERROR: &str = "ImportError";
pub const ATTRIBUTE_ERROR: &str = "AttributeError";
pub const NAME_ERROR: &str = "NameError";
pub const TYPE_ERROR: &str = "TypeError";

/// Visit every node of `forest` in depth-first pre-order, together with its parent's name.
///
/// ## Parameters
/// - `forest`: the roots to walk.
/// - `root_parent`: the name reported as the parent of each root.
/// - `visit`: called as `visit(node, parent_name)`.
pub fn walk<'a, F>(forest: &'a [ExceptionNode], root_parent: &'a str, visit: &mut F)
where
    F: FnMut(&'a ExceptionNode, &'a str),
{
    for exc in forest {
        visit(exc, root_parent);
        walk(exc.children, exc.name, visit);
    }
}

/// Every builtin exception name in creation order (excluding `BaseException`).
pub fn names() -> Vec<&'static str> {
    let mut out = Vec::new();
    walk(BUILTIN_EXCEPTIONS, BASE_EXCEPTION, &mut |exc, _| out.push(exc.name));
    out
}

/// Whether `name` is declared in the builtin forest (or is `BaseException` itself).
pub fn contains(name: &str) -> bool {
    name == BASE_EXCEPTION || parent_of(name).is_some()
}

/// Return the declared parent of a builtin exception, `None` if `name` is not in the forest.
pub fn parent_of(name: &str) -> Option<&'static str> {
    let mut found = None;
    walk(BUILTIN_EXCEPTIONS, BASE_EXCEPTION, &mut |exc, parent| {
        if found.is_none() && exc.name == name {
            found = Some(parent);
        }
    });
    found
}

/// Iterate from `name` up to (but excluding) `BaseException`.
///
/// Yields nothing when `name` is not a builtin exception.
pub fn ancestry(name: &str) -> impl Iterator<Item = &'static str> {
    std::iter::successors(lookup_static(name), |current| {
        parent_of(current).filter(|parent| *parent != BASE_EXCEPTION)
    })
}

fn lookup_static(name: &str) -> Option<&'static str> {
    names().into_iter().find(|n| *n == name)
}
