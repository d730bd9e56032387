//! Filesystem access for listing and measuring directories.
//!
//! Everything goes through [`FileSystem`] so the traversal can run against
//! [`MemoryFs`] in tests instead of real disk state.

pub mod listing;
pub mod memory;
pub mod size;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use listing::{scan_dir, DirectoryScanner, ScanOutcome};
pub use memory::MemoryFs;
pub use size::{Measurement, SizeCalculator};

/// Kind of a filesystem object as seen by a single stat call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    Symlink,
    /// Devices, sockets, FIFOs.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub kind: NodeKind,
    /// Byte length; zero for anything but regular files.
    pub len: u64,
}

impl Metadata {
    pub fn file(len: u64) -> Self {
        Self {
            kind: NodeKind::File,
            len,
        }
    }

    pub fn of_kind(kind: NodeKind) -> Self {
        Self { kind, len: 0 }
    }
}

impl From<fs::Metadata> for Metadata {
    fn from(md: fs::Metadata) -> Self {
        let file_type = md.file_type();
        if file_type.is_file() {
            Metadata::file(md.len())
        } else if file_type.is_dir() {
            Metadata::of_kind(NodeKind::Directory)
        } else if file_type.is_symlink() {
            Metadata::of_kind(NodeKind::Symlink)
        } else {
            Metadata::of_kind(NodeKind::Other)
        }
    }
}

/// Children of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    /// Child paths, each joined onto the listed path.
    pub children: Vec<PathBuf>,
    /// Entries the OS failed to return; they are left out of `children`.
    pub unreadable: usize,
}

/// Directory listing capability.
pub trait FileSystem: Send + Sync {
    /// Stats `path`, following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Stats `path` itself; a symlink reports [`NodeKind::Symlink`].
    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Immediate children of `path`. Fails only if the directory itself
    /// cannot be opened.
    fn read_dir(&self, path: &Path) -> io::Result<DirListing>;

    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }
}

/// The real disk, through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::metadata(path).map(Metadata::from)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::symlink_metadata(path).map(Metadata::from)
    }

    fn read_dir(&self, path: &Path) -> io::Result<DirListing> {
        let mut listing = DirListing::default();
        for entry in fs::read_dir(path)? {
            match entry {
                Ok(entry) => listing.children.push(entry.path()),
                Err(_) => listing.unreadable += 1,
            }
        }
        Ok(listing)
    }
}
