use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::SiftError;

/// A snapshot of one filesystem object, as observed at traversal time.
///
/// Entries are ephemeral — read fresh from the filesystem each time they are
/// built, never cached. A second read of the same path may observe different
/// values if the tree is mutating underneath the walk.
///
/// Predicates evaluate against these fields only; no predicate performs I/O
/// of its own.
pub struct Entry {
    /// Full path to the entry.
    pub path: PathBuf,

    /// The final component of the path, lossily decoded.
    pub name: String,

    /// Whether the entry is a directory (after following symlinks).
    pub is_dir: bool,

    /// Size in bytes. Zero for directories on most platforms.
    pub len: u64,

    /// Last modification time, if the platform reports one.
    /// [`Predicate::modified_between`](crate::Predicate::modified_between)
    /// never matches an entry whose modification time is unavailable.
    pub modified: Option<SystemTime>,

    /// How deep in the walk this entry sits. The root is depth 0, its
    /// immediate children depth 1, and so on.
    pub depth: usize,
}

impl Entry {
    /// Read a fresh snapshot of `path` at the given walk depth.
    pub fn from_path(path: impl AsRef<Path>, depth: usize) -> Result<Self, SiftError> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| SiftError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            name,
            is_dir: meta.is_dir(),
            len: meta.len(),
            modified: meta.modified().ok(),
            depth,
        })
    }
}
