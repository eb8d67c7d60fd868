//! Utility functions for file operations and path manipulation

use crate::config::ConflictPolicy;
use crate::error::{Result, StorageError};
use std::path::{Component, Path, PathBuf};

/// Maximum number of rename attempts when uniquifying a file name
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Final path for a file, handling a taken path according to `policy`
///
/// `exists` reports whether a candidate path is already taken in the store
/// being written to. The check and the later write are separate steps, so
/// this only suits stores that hold a lock across both; a filesystem should
/// claim names with [`uniquify_candidates`] instead.
///
/// # Examples
///
/// ```
/// use minfy_capture::utils::resolve_conflict;
/// use minfy_capture::config::ConflictPolicy;
/// use std::path::PathBuf;
///
/// let taken = PathBuf::from("alice/rec-1/01.jpg");
/// let target = resolve_conflict(&taken, ConflictPolicy::Uniquify, |p| p == taken).unwrap();
/// assert_eq!(target, PathBuf::from("alice/rec-1/01 (1).jpg"));
/// ```
pub fn resolve_conflict<F>(path: &Path, policy: ConflictPolicy, exists: F) -> Result<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    match policy {
        ConflictPolicy::Overwrite => Ok(path.to_path_buf()),
        ConflictPolicy::Uniquify => uniquify_candidates(path, true)?
            .find(|candidate| !exists(candidate))
            .ok_or_else(|| collision(path)),
    }
}

/// Names tried under [`ConflictPolicy::Uniquify`], in order
///
/// Yields `path` itself, then `stem (1).ext`, `stem (2).ext` and so on.
/// With `keep_extension` false the whole file name is the stem, which is
/// what directory names want.
///
/// Callers that can claim a name atomically (exclusive create, no-clobber
/// rename) should walk these instead of checking existence first.
pub fn uniquify_candidates(
    path: &Path,
    keep_extension: bool,
) -> Result<impl Iterator<Item = PathBuf> + use<>> {
    let invalid = |reason: &str| StorageError::InvalidPath {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let (stem, extension) = if keep_extension {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| invalid("Cannot extract file stem"))?;
        let extension = path.extension().and_then(|e| e.to_str());
        (stem.to_string(), extension.map(str::to_string))
    } else {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| invalid("Cannot extract file name"))?;
        (name.to_string(), None)
    };

    let parent = path
        .parent()
        .ok_or_else(|| invalid("Cannot extract parent directory"))?
        .to_path_buf();

    let numbered = (1..=MAX_RENAME_ATTEMPTS).map(move |i| {
        let new_name = match &extension {
            Some(ext) => format!("{} ({}).{}", stem, i, ext),
            None => format!("{} ({})", stem, i),
        };
        parent.join(new_name)
    });
    Ok(std::iter::once(path.to_path_buf()).chain(numbered))
}

/// Error for a name whose every uniquified candidate is taken
pub(crate) fn collision(path: &Path) -> crate::error::Error {
    StorageError::FileCollision {
        path: path.to_path_buf(),
        reason: format!(
            "Could not find unique filename after {} attempts",
            MAX_RENAME_ATTEMPTS
        ),
    }
    .into()
}

/// Whether `name` is usable as exactly one path component
///
/// Rejects empty names, `.`/`..`, and anything containing a separator.
#[must_use]
pub fn is_plain_component(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Check that `path` stays below the directory it will be joined to
pub fn ensure_relative(path: &Path) -> Result<()> {
    let escapes = path.as_os_str().is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(StorageError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path must be relative and stay inside the output directory".to_string(),
        }
        .into());
    }
    Ok(())
}
