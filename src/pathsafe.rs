//! Path-safety gate for preview file serving.
//!
//! The `filename` query parameter of the thumbnail endpoint is the only
//! untrusted-input surface in this subsystem, so resolution is conservative:
//!
//! - The requested path must have at least one registered allowed directory
//!   as a strict ancestor (compared on normalized absolute paths, never on
//!   raw strings, so `..` and separator games cannot escape).
//! - The file extension must be on a fixed allow-list (`.png`, `.jpg`),
//!   case-insensitively.
//!
//! The same ancestor test gates the save-preview write target, so both
//! checks share `path_is_parent`.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Extensions the thumbnail endpoint will ever serve.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg"];

/// Rejection reasons for a requested preview path.
#[derive(Debug, Error)]
pub enum InvalidPath {
    #[error(
        "file cannot be fetched: `{0}`. Must be in one of the directories registered by extra pages"
    )]
    OutsideAllowedDirs(PathBuf),

    #[error("file cannot be fetched: `{0}`. Only png and jpg")]
    BadExtension(PathBuf),
}

// ============================================================================
// Resolution
// ============================================================================

/// Validate an untrusted filename request against the allowed-directory set.
///
/// Returns the normalized absolute path on success, ready to be streamed
/// back by the HTTP layer.
pub fn resolve(filename: &str, allowed_dirs: &[PathBuf]) -> Result<PathBuf, InvalidPath> {
    let requested = absolute(Path::new(filename));

    if !allowed_dirs
        .iter()
        .any(|dir| path_is_parent(dir, &requested))
    {
        return Err(InvalidPath::OutsideAllowedDirs(requested));
    }

    let extension_allowed = requested
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        });

    if !extension_allowed {
        return Err(InvalidPath::BadExtension(requested));
    }

    Ok(requested)
}

// ============================================================================
// Ancestor Test
// ============================================================================

/// Strict ancestor test: is `parent` a proper ancestor of `child`?
///
/// Both sides are normalized to absolute form first, so the comparison is
/// component-wise rather than a raw string prefix match. A path is not its
/// own ancestor.
pub fn path_is_parent(parent: &Path, child: &Path) -> bool {
    let parent = absolute(parent);
    let child = absolute(child);

    child != parent && child.starts_with(&parent)
}

/// Absolute, lexically normalized form of a path.
///
/// `.` components are dropped and `..` pops the previous component, without
/// touching the filesystem. Popping never escapes the root.
pub fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(dirs: &[&str]) -> Vec<PathBuf> {
        dirs.iter().map(PathBuf::from).collect()
    }

    // ------------------------------------------------------------------------
    // absolute / normalization
    // ------------------------------------------------------------------------

    #[test]
    fn test_absolute_resolves_parent_components() {
        let path = Path::new("/a/models/../secrets/x.png");
        assert_eq!(absolute(path), PathBuf::from("/a/secrets/x.png"));
    }

    #[test]
    fn test_absolute_drops_curdir_components() {
        let path = Path::new("/a/./models/./x.png");
        assert_eq!(absolute(path), PathBuf::from("/a/models/x.png"));
    }

    #[test]
    fn test_absolute_never_escapes_root() {
        let path = Path::new("/../../x.png");
        assert_eq!(absolute(path), PathBuf::from("/x.png"));
    }

    // ------------------------------------------------------------------------
    // path_is_parent
    // ------------------------------------------------------------------------

    #[test]
    fn test_parent_of_direct_child() {
        assert!(path_is_parent(
            Path::new("/a/models"),
            Path::new("/a/models/x.png")
        ));
    }

    #[test]
    fn test_parent_of_nested_child() {
        assert!(path_is_parent(
            Path::new("/a/models"),
            Path::new("/a/models/sub/deep/x.png")
        ));
    }

    #[test]
    fn test_path_is_not_its_own_parent() {
        assert!(!path_is_parent(Path::new("/a/models"), Path::new("/a/models")));
    }

    #[test]
    fn test_sibling_name_prefix_is_not_parent() {
        // "/a/models-extra" starts with the string "/a/models" but is a sibling
        assert!(!path_is_parent(
            Path::new("/a/models"),
            Path::new("/a/models-extra/x.png")
        ));
    }

    #[test]
    fn test_traversal_escapes_are_normalized_before_comparison() {
        assert!(!path_is_parent(
            Path::new("/a/models"),
            Path::new("/a/models/../secrets/x.png")
        ));
        // traversal that stays inside is fine
        assert!(path_is_parent(
            Path::new("/a/models"),
            Path::new("/a/models/sub/../x.png")
        ));
    }

    // ------------------------------------------------------------------------
    // resolve
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_accepts_allowed_png() {
        let dirs = allowed(&["/a/models"]);
        let resolved = resolve("/a/models/x.png", &dirs).unwrap();
        assert_eq!(resolved, PathBuf::from("/a/models/x.png"));
    }

    #[test]
    fn test_resolve_accepts_uppercase_extension() {
        let dirs = allowed(&["/a/models"]);
        assert!(resolve("/a/models/x.PNG", &dirs).is_ok());
        assert!(resolve("/a/models/x.JpG", &dirs).is_ok());
    }

    #[test]
    fn test_resolve_rejects_outside_allowed_dirs_regardless_of_extension() {
        let dirs = allowed(&["/a/models"]);
        let err = resolve("/elsewhere/x.png", &dirs).unwrap_err();
        assert!(matches!(err, InvalidPath::OutsideAllowedDirs(_)));
    }

    #[test]
    fn test_resolve_rejects_traversal_out_of_allowed_dir() {
        let dirs = allowed(&["/a/models"]);
        let err = resolve("/a/models/../../etc/passwd.png", &dirs).unwrap_err();
        assert!(matches!(err, InvalidPath::OutsideAllowedDirs(_)));
    }

    #[test]
    fn test_resolve_rejects_disallowed_extension_inside_allowed_dir() {
        let dirs = allowed(&["/a/models"]);
        for name in ["x.gif", "x.svg", "x.txt", "x"] {
            let err = resolve(&format!("/a/models/{name}"), &dirs).unwrap_err();
            assert!(matches!(err, InvalidPath::BadExtension(_)), "{name}");
        }
    }

    #[test]
    fn test_resolve_rejects_everything_with_empty_allowed_set() {
        let err = resolve("/a/models/x.png", &[]).unwrap_err();
        assert!(matches!(err, InvalidPath::OutsideAllowedDirs(_)));
    }

    #[test]
    fn test_resolve_checks_any_of_multiple_dirs() {
        let dirs = allowed(&["/a/models", "/b/embeddings"]);
        assert!(resolve("/b/embeddings/y.jpg", &dirs).is_ok());
    }

    #[test]
    fn test_error_message_names_offending_path() {
        let err = resolve("/elsewhere/x.png", &allowed(&["/a/models"])).unwrap_err();
        assert!(format!("{err}").contains("/elsewhere/x.png"));
    }
}
