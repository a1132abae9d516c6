//! Dotted module names.
//!
//! A fully-qualified module name is a dot-separated path (`pkg.sub.mod`). These helpers are purely
//! structural: they never consult a registry, so the import resolver layers its lookup policy on top.

use std::path::Path;

/// Separator between module name segments.
pub const SEPARATOR: char = '.';

/// Return the enclosing package of a dotted name, `None` for a single-segment name.
///
/// ## Examples
/// ```rust
/// use pyhost_core::names;
///
/// assert_eq!(names::parent("pkg.sub.mod"), Some("pkg.sub"));
/// assert_eq!(names::parent("mod"), None);
/// ```
pub fn parent(dotted: &str) -> Option<&str> {
    dotted.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

/// Name `requested` as a sibling of `caller` within the caller's enclosing package.
///
/// Returns `None` when `caller` has no enclosing package.
pub fn sibling(caller: &str, requested: &str) -> Option<String> {
    parent(caller).map(|package| child(package, requested))
}

/// Name `requested` as a direct child of `parent`.
pub fn child(parent: &str, requested: &str) -> String {
    let mut out = String::with_capacity(parent.len() + 1 + requested.len());
    out.push_str(parent);
    out.push(SEPARATOR);
    out.push_str(requested);
    out
}

/// Derive the dotted module name of a source file relative to `base`.
///
/// ## Parameters
/// - `path`: the module's source file (e.g. `src/app/models/__init__.py`).
/// - `base`: the directory module names are relative to (e.g. `src`).
///
/// ## Returns
/// - (`Option<String>`): the dotted name (`app.models`), or `None` when `path` is not under `base` or has
///   no file stem.
///
/// ## Notes
/// - The extension is dropped and a trailing `__init__` segment names the package itself.
pub fn module_name_from_path(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let stem = relative.file_stem()?.to_str()?;

    let mut parts: Vec<&str> = Vec::new();
    if let Some(dir) = relative.parent() {
        for component in dir.components() {
            parts.push(component.as_os_str().to_str()?);
        }
    }
    if stem != "__init__" {
        parts.push(stem);
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_sibling_and_child() {
        assert_eq!(sibling("pkg.sub.mod", "x").as_deref(), Some("pkg.sub.x"));
        assert_eq!(sibling("mod", "x"), None);
        assert_eq!(child("pkg.sub.mod", "x"), "pkg.sub.mod.x");
    }

    #[test]
    fn test_module_name_from_path_plain_module() {
        let name = module_name_from_path(&PathBuf::from("/src/app/models.py"), &PathBuf::from("/src"));
        assert_eq!(name.as_deref(), Some("app.models"));
    }

    #[test]
    fn test_module_name_from_path_package_init() {
        let name = module_name_from_path(&PathBuf::from("/src/app/models/__init__.py"), &PathBuf::from("/src"));
        assert_eq!(name.as_deref(), Some("app.models"));
    }

    #[test]
    fn test_module_name_from_path_outside_base() {
        let name = module_name_from_path(&PathBuf::from("/other/app.py"), &PathBuf::from("/src"));
        assert_eq!(name, None);
    }

    #[test]
    fn test_module_name_from_path_top_level_init() {
        let name = module_name_from_path(&PathBuf::from("/src/__init__.py"), &PathBuf::from("/src"));
        assert_eq!(name, None);
    }
}
