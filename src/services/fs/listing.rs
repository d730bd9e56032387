use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;

use super::{FileSystem, NodeKind, SizeCalculator};
use crate::core::errors::{Error, Result};
use crate::models::{DirectoryEntry, EntryKind, SortSpec};

#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub entries: Vec<DirectoryEntry>,
    /// Objects left out of the listing or of a folder's size because they
    /// could not be read.
    pub skipped: usize,
}

/// Lists the immediate children of a directory with their recursive sizes.
pub struct DirectoryScanner<'a> {
    fs: &'a dyn FileSystem,
    sizes: SizeCalculator<'a>,
}

impl<'a> DirectoryScanner<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            sizes: SizeCalculator::new(fs),
        }
    }

    pub fn scan(&self, path: &Path, sort: SortSpec) -> Result<ScanOutcome> {
        let meta = self
            .fs
            .metadata(path)
            .map_err(|e| Error::from_io(path, e))?;
        if meta.kind != NodeKind::Directory {
            return Err(Error::NotADirectory(path.to_path_buf()));
        }

        let listing = self
            .fs
            .read_dir(path)
            .map_err(|e| Error::from_io(path, e))?;

        let mut outcome = ScanOutcome {
            entries: Vec::with_capacity(listing.children.len()),
            skipped: listing.unreadable,
        };
        for child in listing.children {
            match self.entry(&child) {
                Ok((entry, skipped)) => {
                    outcome.skipped += skipped;
                    outcome.entries.push(entry);
                }
                Err(err) if err.is_skippable() => outcome.skipped += 1,
                Err(err) => return Err(err),
            }
        }

        sort.apply(&mut outcome.entries);
        Ok(outcome)
    }

    fn entry(&self, path: &Path) -> Result<(DirectoryEntry, usize)> {
        let meta = self.fs.symlink_metadata(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::Vanished(path.to_path_buf())
            } else {
                Error::from_io(path, e)
            }
        })?;

        let kind = match meta.kind {
            NodeKind::Directory => EntryKind::Folder,
            _ => EntryKind::File,
        };
        let measured = self.sizes.measure_node(path, &meta);

        Ok((DirectoryEntry::new(path, kind, measured.bytes), measured.skipped))
    }
}

/// Runs a scan on the blocking pool so the async executor keeps serving.
pub async fn scan_dir(
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    sort: SortSpec,
) -> Result<ScanOutcome> {
    task::spawn_blocking(move || DirectoryScanner::new(fs.as_ref()).scan(&path, sort))
        .await
        .map_err(|e| Error::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortKey, SortOrder};
    use crate::services::fs::MemoryFs;

    fn data_fs() -> MemoryFs {
        MemoryFs::new()
            .file("/data/a.txt", 100)
            .file("/data/sub/b.txt", 50)
    }

    #[test]
    fn scan_reports_files_and_folders_with_sizes() -> Result<()> {
        let fs = data_fs();
        let outcome = DirectoryScanner::new(&fs).scan(Path::new("/data"), SortSpec::default())?;

        assert_eq!(outcome.skipped, 0);
        assert_eq!(
            outcome.entries,
            vec![
                DirectoryEntry::new(Path::new("/data/a.txt"), EntryKind::File, 100),
                DirectoryEntry::new(Path::new("/data/sub"), EntryKind::Folder, 50),
            ]
        );
        Ok(())
    }

    #[test]
    fn one_entry_per_immediate_child() -> Result<()> {
        let fs = MemoryFs::new()
            .file("/root/f", 1)
            .file("/root/deep/a/b/c/d/e", 2)
            .file("/root/deep/x", 3)
            .dir("/root/empty");

        let outcome = DirectoryScanner::new(&fs).scan(Path::new("/root"), SortSpec::default())?;
        let names: Vec<_> = outcome.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["deep", "empty", "f"]);
        assert_eq!(outcome.entries[0].size_bytes, 5);
        assert_eq!(outcome.entries[1].size_bytes, 0);
        Ok(())
    }

    #[test]
    fn sort_spec_is_applied() -> Result<()> {
        let fs = data_fs().file("/data/big.bin", 4096);
        let sort = SortSpec::new(SortKey::Size, SortOrder::Desc);

        let outcome = DirectoryScanner::new(&fs).scan(Path::new("/data"), sort)?;
        let names: Vec<_> = outcome.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["big.bin", "a.txt", "sub"]);
        Ok(())
    }

    #[test]
    fn symlink_children_are_files_of_size_zero() -> Result<()> {
        let fs = data_fs().symlink("/data/link", "/data/sub");

        let outcome = DirectoryScanner::new(&fs).scan(Path::new("/data"), SortSpec::default())?;
        let link = outcome
            .entries
            .iter()
            .find(|e| e.name == "link")
            .expect("link entry");
        assert_eq!(link.kind, EntryKind::File);
        assert_eq!(link.size_bytes, 0);
        Ok(())
    }

    #[test]
    fn symlinked_root_is_listed() -> Result<()> {
        let fs = data_fs().symlink("/alias", "/data");

        let outcome = DirectoryScanner::new(&fs).scan(Path::new("/alias"), SortSpec::default())?;
        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.entries[0].path, "/alias/a.txt");
        Ok(())
    }

    #[test]
    fn vanished_children_are_skipped_and_counted() -> Result<()> {
        let fs = data_fs().ghost("/data/gone").deny("/data/sub");

        let outcome = DirectoryScanner::new(&fs).scan(Path::new("/data"), SortSpec::default())?;
        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.skipped, 2);

        let sub = outcome.entries.iter().find(|e| e.name == "sub").expect("sub entry");
        assert_eq!(sub.size_bytes, 0);
        Ok(())
    }

    #[test]
    fn unreadable_child_entries_do_not_fail_the_scan() -> Result<()> {
        let fs = data_fs().broken("/data/bad");

        let outcome = DirectoryScanner::new(&fs).scan(Path::new("/data"), SortSpec::default())?;
        let names: Vec<_> = outcome.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "sub"]);
        assert_eq!(outcome.skipped, 1);
        Ok(())
    }

    #[test]
    fn invalid_roots_are_rejected() {
        let fs = data_fs().deny("/data");
        let scanner = DirectoryScanner::new(&fs);

        let err = scanner.scan(Path::new("/missing"), SortSpec::default()).unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));

        let err = scanner.scan(Path::new("/data/a.txt"), SortSpec::default()).unwrap_err();
        assert!(matches!(err, Error::NotADirectory(_)));

        let err = scanner.scan(Path::new("/data"), SortSpec::default()).unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn scan_dir_runs_on_blocking_pool() -> Result<()> {
        let fs: Arc<dyn FileSystem> = Arc::new(data_fs());
        let outcome = scan_dir(fs, PathBuf::from("/data"), SortSpec::default()).await?;
        assert_eq!(outcome.entries.len(), 2);
        Ok(())
    }
}
