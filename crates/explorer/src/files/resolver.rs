//! Resolution of user-supplied names against the cursor.
//!
//! No filesystem access happens here; the operation that consumes the
//! resolved path reports whether it exists.

use std::path::{Component, Path, PathBuf};

use crate::error::{ExplorerError, Result};

/// Name that refers to the parent of the cursor.
pub const PARENT: &str = "..";

/// Resolve `name` against `cursor`.
///
/// - `..` yields the parent of the cursor, or `/` when the cursor is root.
/// - A name starting with `/` is used as is.
/// - Anything else is joined onto the cursor.
///
/// `..` components inside a longer name are left for the kernel to
/// resolve, since collapsing them lexically picks a different file when
/// the preceding component is a symlink.
pub fn resolve(cursor: &Path, name: &str) -> PathBuf {
    if name == PARENT {
        return parent_of(cursor);
    }

    let joined = if name.starts_with('/') {
        PathBuf::from(name)
    } else {
        cursor.join(name)
    };

    tidy(&joined)
}

/// Resolve a name after rejecting empty input.
pub fn resolve_name(cursor: &Path, name: &str) -> Result<PathBuf> {
    if name.trim().is_empty() {
        return Err(ExplorerError::InvalidName(name.to_string()));
    }
    Ok(resolve(cursor, name))
}

/// Parent of `path`, trimming its last component and falling back to root.
pub fn parent_of(path: &Path) -> PathBuf {
    match tidy(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("/"),
    }
}

/// Drop `.` components and trailing separators.
///
/// The result names the same file as `path`.
pub fn tidy(path: &Path) -> PathBuf {
    let tidied: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if tidied.as_os_str().is_empty() {
        PathBuf::from(if path.has_root() { "/" } else { "." })
    } else {
        tidied
    }
}
