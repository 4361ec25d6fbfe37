use std::fs::{self, ReadDir};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::entry::Entry;
use crate::error::SiftError;
use crate::predicate::Predicate;

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A directory whose handle is currently open.
#[derive(Debug)]
struct OpenDir {
    path: PathBuf,
    reader: ReadDir,
    depth: usize,
}

/// Per-walk traversal state, owned exclusively by one [`FileWalk`].
///
/// Depth-first pre-order: directories accepted by the directory predicate are
/// stacked for expansion; at most one `ReadDir` handle is open at a time.
/// Rejection by the directory predicate prunes the whole subtree — nothing
/// beneath a rejected directory is read or materialized.
#[derive(Debug)]
struct Cursor {
    file_pred: Predicate,
    dir_pred: Predicate,
    /// Directories accepted for expansion, LIFO. Popping the most recently
    /// discovered directory first keeps the schedule depth-first.
    pending: Vec<(PathBuf, usize)>,
    current: Option<OpenDir>,
    /// Holds the root itself when the walk was opened on a non-directory.
    ready: Option<PathBuf>,
}

impl Cursor {
    fn new(root: &Path, file_pred: Predicate, dir_pred: Predicate) -> Result<Self, SiftError> {
        let root_entry = Entry::from_path(root, 0).map_err(|e| match e {
            SiftError::Io { path, source } if source.kind() == ErrorKind::NotFound => {
                SiftError::RootNotFound(path)
            }
            other => other,
        })?;

        let mut cursor = Self {
            file_pred,
            dir_pred,
            pending: Vec::new(),
            current: None,
            ready: None,
        };

        // The directory predicate is consulted for the root itself; a
        // rejected root yields an empty walk without opening any handle.
        // A non-directory root is the sole candidate for the file predicate.
        if root_entry.is_dir {
            if cursor.dir_pred.matches(&root_entry) {
                cursor.pending.push((root_entry.path, 0));
            }
        } else if cursor.file_pred.matches(&root_entry) {
            cursor.ready = Some(root_entry.path);
        }

        Ok(cursor)
    }

    /// Expand just enough pending work to produce the next match or prove
    /// exhaustion. Any I/O failure aborts the walk; the caller releases the
    /// cursor on `Err`.
    fn next_match(&mut self) -> Result<Option<PathBuf>, SiftError> {
        if let Some(path) = self.ready.take() {
            return Ok(Some(path));
        }

        loop {
            if self.current.is_none() {
                match self.pending.pop() {
                    Some((dir, depth)) => {
                        let reader = fs::read_dir(&dir).map_err(|e| SiftError::io(&dir, e))?;
                        self.current = Some(OpenDir {
                            path: dir,
                            reader,
                            depth,
                        });
                    }
                    None => return Ok(None),
                }
            }
            let Some(open) = self.current.as_mut() else {
                return Ok(None);
            };

            match open.reader.next() {
                None => {
                    self.current = None;
                }
                Some(Err(e)) => {
                    let path = open.path.clone();
                    return Err(SiftError::io(path, e));
                }
                Some(Ok(dirent)) => {
                    let child_depth = open.depth + 1;
                    let name = dirent.file_name().to_string_lossy().into_owned();
                    let path = dirent.path();
                    // Fresh stat, following symlinks. An entry that cannot
                    // be stat'd is an unreadable subtree and aborts the walk.
                    let meta = fs::metadata(&path).map_err(|e| SiftError::io(&path, e))?;
                    let entry = Entry {
                        path,
                        name,
                        is_dir: meta.is_dir(),
                        len: meta.len(),
                        modified: meta.modified().ok(),
                        depth: child_depth,
                    };

                    if entry.is_dir {
                        if self.dir_pred.matches(&entry) {
                            self.pending.push((entry.path, child_depth));
                        }
                    } else if self.file_pred.matches(&entry) {
                        return Ok(Some(entry.path));
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// FileWalk
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum State {
    Active(Cursor),
    Exhausted,
    Closed,
}

/// A lazy, forward-only, closable walk over matching files.
///
/// Each call to [`next`](Iterator::next) performs exactly enough directory
/// reading to produce the next matching path or determine exhaustion. Between
/// pulls the walk may hold an open directory handle; that handle is released
/// when the walk is fully drained, when [`close`](FileWalk::close) is called,
/// when a pull surfaces an error, or when the walk is dropped — whichever
/// comes first. Dropping the walk is always safe: abandonment cannot leak the
/// handle.
///
/// An I/O failure mid-walk (an unreadable subdirectory, an entry that cannot
/// be stat'd) surfaces at the pull that triggered the failing read; after
/// that the walk is exhausted. Pulling after an explicit `close` yields
/// [`SiftError::Closed`] once, then the walk is fused.
///
/// The walk observes live filesystem state, not a snapshot: entries created
/// or removed mid-walk may or may not appear, depending on what the
/// underlying directory reads had already buffered.
///
/// # Example
///
/// ```rust
/// use dirsift::{iterate_files, Predicate};
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("a.txt"), "").unwrap();
/// std::fs::write(dir.path().join("b.txt"), "").unwrap();
///
/// let mut walk = iterate_files(dir.path(), Predicate::extensions(&["txt"]), None).unwrap();
/// let first = walk.next().unwrap().unwrap();
/// assert_eq!(first.extension().unwrap(), "txt");
/// walk.close(); // releases the open directory handle early
/// ```
#[derive(Debug)]
pub struct FileWalk {
    state: State,
}

impl FileWalk {
    /// Open a walk rooted at `root`.
    ///
    /// Unlike [`iterate_files`](crate::iterate_files), `root` may refer to a
    /// non-directory entry: the file predicate is then applied to it directly
    /// and the walk yields it as the sole candidate, or nothing.
    ///
    /// `dir_pred` of `None` means unrestricted recursive descent.
    ///
    /// # Errors
    ///
    /// [`SiftError::RootNotFound`] if `root` does not exist; the initial stat
    /// is the only I/O performed before the first pull.
    pub fn new(
        root: impl AsRef<Path>,
        file_pred: Predicate,
        dir_pred: Option<Predicate>,
    ) -> Result<Self, SiftError> {
        let cursor = Cursor::new(
            root.as_ref(),
            file_pred,
            dir_pred.unwrap_or(Predicate::True),
        )?;
        Ok(Self {
            state: State::Active(cursor),
        })
    }

    /// Release the walk's resources immediately.
    ///
    /// Idempotent in effect; any pull after the first close reports
    /// [`SiftError::Closed`] once and the walk is fused thereafter.
    pub fn close(&mut self) {
        self.state = State::Closed;
    }
}

impl Iterator for FileWalk {
    type Item = Result<PathBuf, SiftError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            State::Active(cursor) => match cursor.next_match() {
                Ok(Some(path)) => Some(Ok(path)),
                Ok(None) => {
                    self.state = State::Exhausted;
                    None
                }
                Err(e) => {
                    // Abort policy: the failing pull surfaces the error and
                    // the cursor (with its open handle) is dropped here.
                    self.state = State::Exhausted;
                    Some(Err(e))
                }
            },
            State::Exhausted => None,
            State::Closed => {
                self.state = State::Exhausted;
                Some(Err(SiftError::Closed))
            }
        }
    }
}
