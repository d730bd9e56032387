use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// The entry disappeared between being listed and being measured.
    #[error("entry vanished during scan: {}", .0.display())]
    Vanished(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("blocking task failed: {0}")]
    Task(String),
}

impl Error {
    /// Classifies an io error raised while touching `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::PathNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(path.to_path_buf()),
            _ => Error::Io(err),
        }
    }

    /// True for conditions a traversal may step over instead of aborting.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Error::PathNotFound(_) | Error::PermissionDenied(_) | Error::Vanished(_)
        )
    }
}
