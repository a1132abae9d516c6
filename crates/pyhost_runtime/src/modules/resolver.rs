//! Three-tier module name resolution.
//!
//! Given the literal name in an import statement and the fully-qualified name of the importing module, the
//! first registered candidate wins:
//!
//! 1. [`Tier::Absolute`]: the requested name as-is.
//! 2. [`Tier::Sibling`]: the requested name inside the caller's enclosing package
//!    (`pkg.sub.mod` importing `x` tries `pkg.sub.x`).
//! 3. [`Tier::Child`]: the requested name beneath the caller itself (`pkg.sub.mod.x`).
//!
//! ## Notes
//! - A caller without an enclosing package (a single-segment name) has no sibling tier.
//! - Resolution is purely a name lookup; instantiation is the cache's job.

use std::fmt;

use pyhost_core::names;

/// Which rule produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Absolute,
    Sibling,
    Child,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::Absolute => "absolute",
            Tier::Sibling => "sibling",
            Tier::Child => "child",
        })
    }
}

/// A requested name mapped to a registered fully-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub fq_name: String,
    pub tier: Tier,
}

/// Resolve `requested`, imported from `caller`, using `is_registered` to test candidates.
///
/// ## Parameters
/// - `requested`: the literal name from the import statement.
/// - `caller`: the fully-qualified name of the importing module.
/// - `is_registered`: whether a fully-qualified name has a factory.
///
/// ## Returns
/// - (`Option<Resolution>`): the first registered candidate, `None` when no tier matches.
///
/// ## Examples
/// ```rust
/// use pyhost_runtime::modules::{resolve_name, Tier};
///
/// let registered = ["pkg.sub.x", "pkg.sub.mod.x"];
/// let res = resolve_name("x", "pkg.sub.mod", |n| registered.iter().any(|r| *r == n)).unwrap();
/// assert_eq!((res.fq_name.as_str(), res.tier), ("pkg.sub.x", Tier::Sibling));
/// ```
pub fn resolve_name(requested: &str, caller: &str, is_registered: impl Fn(&str) -> bool) -> Option<Resolution> {
    if is_registered(requested) {
        return Some(Resolution {
            fq_name: requested.to_string(),
            tier: Tier::Absolute,
        });
    }

    // A single-segment caller has no package, so no `.x` sibling candidate is tried.
    if let Some(sibling) = names::sibling(caller, requested) {
        if is_registered(sibling.as_str()) {
            return Some(Resolution {
                fq_name: sibling,
                tier: Tier::Sibling,
            });
        }
    }

    if caller.is_empty() {
        return None;
    }
    let child = names::child(caller, requested);
    is_registered(child.as_str()).then_some(Resolution {
        fq_name: child,
        tier: Tier::Child,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered<'a>(names: &'a [&'a str]) -> impl Fn(&str) -> bool + 'a {
        move |n: &str| names.iter().any(|r| *r == n)
    }

    #[test]
    fn test_absolute_wins_over_everything() {
        let names = ["x", "pkg.x", "pkg.mod.x"];
        let res = resolve_name("x", "pkg.mod", registered(&names)).unwrap();
        assert_eq!(res.tier, Tier::Absolute);
        assert_eq!(res.fq_name, "x");
    }

    #[test]
    fn test_sibling_wins_over_child() {
        let names = ["pkg.sub.x", "pkg.sub.mod.x"];
        let res = resolve_name("x", "pkg.sub.mod", registered(&names)).unwrap();
        assert_eq!(res.fq_name, "pkg.sub.x");
        assert_eq!(res.tier, Tier::Sibling);
    }

    #[test]
    fn test_child_tier() {
        let names = ["pkg.mod.x"];
        let res = resolve_name("x", "pkg.mod", registered(&names)).unwrap();
        assert_eq!(res.fq_name, "pkg.mod.x");
        assert_eq!(res.tier, Tier::Child);
    }

    #[test]
    fn test_top_level_caller_skips_sibling_tier() {
        let names = [".x", "main.x"];
        let res = resolve_name("x", "main", registered(&names)).unwrap();
        assert_eq!(res.fq_name, "main.x");
        assert_eq!(res.tier, Tier::Child);
    }

    #[test]
    fn test_dotted_request_resolves_relative() {
        let names = ["pkg.util.strings"];
        let res = resolve_name("util.strings", "pkg.main", registered(&names)).unwrap();
        assert_eq!(res.fq_name, "pkg.util.strings");
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(resolve_name("x", "pkg.mod", registered(&[])), None);
        assert_eq!(resolve_name("x", "", registered(&["x.y"])), None);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::Sibling.to_string(), "sibling");
    }
}
