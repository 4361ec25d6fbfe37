//! # dirsift
//!
//! Composable file predicates and a prune-aware directory walker — eager or
//! lazy, zero opinions.
//!
//! dirsift enumerates the files under a directory tree according to two
//! independent predicates: a *file predicate* decides which non-directory
//! entries appear in the result, and a *directory predicate* gates descent —
//! a rejected directory is pruned whole, nothing beneath it is ever read.
//! Results come back either fully materialized ([`list_files`]) or as a
//! lazy, closable pull sequence ([`iterate_files`], [`stream_files`]).
//!
//! # Quick Start
//!
//! ```rust
//! use dirsift::{list_files, Predicate};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("build.xml"), "").unwrap();
//! std::fs::write(dir.path().join("README"), "").unwrap();
//!
//! let files = list_files(dir.path(), Predicate::extensions(&["xml"]), None).unwrap();
//! assert_eq!(files.len(), 1);
//! ```
//!
//! # Predicates compose
//!
//! Predicates are immutable values under a small boolean algebra — build them
//! once, reuse them across any number of walks, share them across threads:
//!
//! ```rust
//! use dirsift::Predicate;
//!
//! // files over 1 KiB that are not logs, for a walk that skips CVS metadata
//! let file_pred = Predicate::size_between(Some(1024), None)
//!     .and(Predicate::extensions(&["log"]).negate());
//! let dir_pred = Predicate::excluding_name(None, "CVS");
//! # let _ = (file_pred, dir_pred);
//! ```
//!
//! # Laziness and resources
//!
//! A [`FileWalk`] reads just enough of the tree per pull to yield the next
//! match, and may hold an open directory handle between pulls. The handle is
//! released on full drain, on [`FileWalk::close`], on the pull that surfaces
//! an error, or on drop — whichever comes first. The walk observes live
//! filesystem state, not a snapshot; trees that mutate mid-walk are
//! tolerated, not detected.

#![forbid(unsafe_code)]

mod entry;
mod error;
mod naming;
mod predicate;
mod walk;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use entry::Entry;
pub use error::SiftError;
pub use naming::NamingRules;
pub use predicate::Predicate;
pub use walk::FileWalk;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

// ── Entry points ──────────────────────────────────────────────────────────────

/// Eagerly collect every file under `root` accepted by `file_pred`,
/// descending only into directories accepted by `dir_pred`.
///
/// `dir_pred` of `None` means unrestricted recursive descent. Within one
/// directory, entries come back in whatever order the underlying directory
/// read yields them; across directories the order is the depth-first
/// schedule.
///
/// # Errors
///
/// [`SiftError::RootNotFound`] / [`SiftError::NotADirectory`] if `root` is
/// not an existing directory, checked before any traversal work. Any I/O
/// failure mid-walk (an unreadable subdirectory, an entry that cannot be
/// stat'd) aborts the whole call — there is no silent-skip mode.
///
/// # Example
///
/// ```rust
/// use dirsift::{list_files, Predicate};
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("notes.txt"), "").unwrap();
/// std::fs::create_dir(dir.path().join("CVS")).unwrap();
/// std::fs::write(dir.path().join("CVS").join("Entries"), "").unwrap();
///
/// let files = list_files(
///     dir.path(),
///     Predicate::True,
///     Some(Predicate::excluding_name(None, "CVS")),
/// )
/// .unwrap();
/// assert_eq!(files.len(), 1);
/// ```
pub fn list_files(
    root: impl AsRef<Path>,
    file_pred: Predicate,
    dir_pred: Option<Predicate>,
) -> Result<Vec<PathBuf>, SiftError> {
    let root = root.as_ref();
    ensure_directory(root)?;
    FileWalk::new(root, file_pred, dir_pred)?.collect()
}

/// Lazily walk the files under `root` accepted by `file_pred`, descending
/// only into directories accepted by `dir_pred`.
///
/// Same semantics as [`list_files`], pull-based: each `next()` expands just
/// enough pending directories to produce one match. The returned [`FileWalk`]
/// must be drained, [closed](FileWalk::close), or dropped to release its
/// directory handle; a mid-walk I/O failure surfaces at the triggering pull
/// and exhausts the walk.
///
/// # Errors
///
/// [`SiftError::RootNotFound`] / [`SiftError::NotADirectory`] if `root` is
/// not an existing directory; no other I/O happens before the first pull.
pub fn iterate_files(
    root: impl AsRef<Path>,
    file_pred: Predicate,
    dir_pred: Option<Predicate>,
) -> Result<FileWalk, SiftError> {
    let root = root.as_ref();
    ensure_directory(root)?;
    FileWalk::new(root, file_pred, dir_pred)
}

/// Lazily walk the files under `root` with a fixed extension set.
///
/// `extensions` of `None` (or an empty slice) accepts every non-directory
/// entry. Matching is case-sensitive. `recursive` of `false` restricts the
/// walk to the root's immediate children — every subdirectory is pruned.
///
/// # Example
///
/// ```rust
/// use dirsift::stream_files;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("build.xml"), "").unwrap();
/// std::fs::write(dir.path().join("notes.md"), "").unwrap();
///
/// let walk = stream_files(dir.path(), true, Some(&["xml"])).unwrap();
/// let found: Result<Vec<_>, _> = walk.collect();
/// assert_eq!(found.unwrap().len(), 1);
/// ```
pub fn stream_files(
    root: impl AsRef<Path>,
    recursive: bool,
    extensions: Option<&[&str]>,
) -> Result<FileWalk, SiftError> {
    let file_pred = match extensions {
        Some(exts) if !exts.is_empty() => Predicate::extensions(exts),
        _ => Predicate::True,
    };
    let dir_pred = if recursive {
        Predicate::True
    } else {
        // The root sits at depth 0 and stays accepted; everything deeper
        // is pruned.
        Predicate::max_depth(0)
    };
    iterate_files(root, file_pred, Some(dir_pred))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Root validation for the directory-oriented entry points. Runs before any
/// traversal work; the stat here is the only I/O on the failure paths.
fn ensure_directory(root: &Path) -> Result<(), SiftError> {
    let meta = fs::metadata(root).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            SiftError::RootNotFound(root.to_path_buf())
        } else {
            SiftError::io(root, e)
        }
    })?;
    if meta.is_dir() {
        Ok(())
    } else {
        Err(SiftError::NotADirectory(root.to_path_buf()))
    }
}
