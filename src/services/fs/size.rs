use std::path::Path;

use super::{FileSystem, Metadata, NodeKind};
use crate::core::errors::{Error, Result};

/// Bytes found under a path, plus how many objects could not be read on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measurement {
    pub bytes: u64,
    pub skipped: usize,
}

/// Sums regular-file sizes under a path.
///
/// Symlinks and special files count as zero and are never followed. Below the
/// starting path, unreadable directories and entries that vanish mid-walk are
/// skipped and counted in [`Measurement::skipped`].
pub struct SizeCalculator<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> SizeCalculator<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    pub fn size(&self, path: &Path) -> Result<u64> {
        self.measure(path).map(|m| m.bytes)
    }

    /// Fails only if `path` itself cannot be stat'ed.
    pub fn measure(&self, path: &Path) -> Result<Measurement> {
        let meta = self
            .fs
            .symlink_metadata(path)
            .map_err(|e| Error::from_io(path, e))?;
        Ok(self.measure_node(path, &meta))
    }

    /// Measures an object whose metadata the caller already holds.
    pub fn measure_node(&self, path: &Path, meta: &Metadata) -> Measurement {
        match meta.kind {
            NodeKind::File => Measurement {
                bytes: meta.len,
                skipped: 0,
            },
            NodeKind::Directory => self.walk(path),
            NodeKind::Symlink | NodeKind::Other => Measurement::default(),
        }
    }

    fn walk(&self, root: &Path) -> Measurement {
        let mut total = Measurement::default();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let listing = match self.fs.read_dir(&dir) {
                Ok(listing) => listing,
                Err(_) => {
                    total.skipped += 1;
                    continue;
                }
            };
            total.skipped += listing.unreadable;

            for child in listing.children {
                match self.fs.symlink_metadata(&child) {
                    Ok(meta) => match meta.kind {
                        NodeKind::File => total.bytes = total.bytes.saturating_add(meta.len),
                        NodeKind::Directory => pending.push(child),
                        NodeKind::Symlink | NodeKind::Other => {}
                    },
                    Err(_) => total.skipped += 1,
                }
            }
        }

        total
    }
}
