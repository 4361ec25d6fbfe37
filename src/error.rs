use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiftError {
    // Root validation — checked before any traversal work begins
    #[error("root not found")]
    RootNotFound(PathBuf),

    #[error("root is not a directory")]
    NotADirectory(PathBuf),

    // Predicate construction
    #[error("invalid wildcard pattern")]
    Pattern(#[from] globset::Error),

    #[error("invalid regex pattern")]
    Regex(#[from] regex::Error),

    // Traversal
    #[error("read failed")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Lifecycle
    #[error("walk consumed after close")]
    Closed,
}

impl SiftError {
    /// The path this error occurred at, if applicable.
    /// Callers use this to present "failed at: <path>" without pattern matching on variants.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::RootNotFound(p) | Self::NotADirectory(p) | Self::Io { path: p, .. } => {
                Some(p.as_path())
            }
            _ => None,
        }
    }

    /// Wrap an I/O failure with the path that triggered it.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
