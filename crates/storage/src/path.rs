//! Path normalization.
//!
//! Module identities are paths handed over by the bundler host; they are
//! normalized lexically (no filesystem access) so that `./a/../page.html` and
//! `page.html` name the same source.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Lexically normalizes a path.
///
/// Removes `.` components and duplicate separators and resolves `..` against
/// the preceding component. A leading root is kept, so absolute paths stay
/// absolute and relative paths stay relative.
///
/// > **Note:** This does **not** resolve symlinks. Null bytes are explicitly
/// >           rejected.
///
/// # Returns
/// Returns the normalized path, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if the path is empty, names only the root, or climbs above its start.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use htmlentry_storage::normalize_path;
/// assert_eq!(normalize_path("/src/./pages//index.html").unwrap(), Path::new("/src/pages/index.html"));
/// assert_eq!(normalize_path("/src/pages/../main.js").unwrap(), Path::new("/src/main.js"));
/// assert_eq!(normalize_path("pages/index.html").unwrap(), Path::new("pages/index.html"));
/// assert!(normalize_path("/../etc/passwd").is_err());
/// assert!(normalize_path("a\0b").is_err());
/// ```
pub fn normalize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let mut normalized = PathBuf::new();
    let mut depth = 0usize;
    for component in original.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
                }
                normalized.push(s);
                depth += 1;
            },
            Component::RootDir => normalized.push(Component::RootDir),
            Component::CurDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(original.to_path_buf())),
            Component::ParentDir => {
                if depth == 0 {
                    exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
                }
                normalized.pop();
                depth -= 1;
            },
        }
    }
    match depth {
        0 => exn::bail!(ErrorKind::InvalidPath(original.to_path_buf())),
        _ => Ok(normalized),
    }
}
