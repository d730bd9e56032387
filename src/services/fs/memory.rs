use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{DirListing, FileSystem, Metadata, NodeKind};

const MAX_LINK_HOPS: usize = 40;

#[derive(Debug, Clone)]
enum Node {
    File(u64),
    Dir,
    Symlink(PathBuf),
    Special,
    /// Listed by its parent but gone by the time it is stat'ed.
    Ghost,
    /// An entry the OS fails to return while its parent is being read.
    Broken,
}

/// In-memory tree implementing [`FileSystem`].
///
/// Parents are created implicitly. `deny` makes a directory unreadable while it
/// can still be stat'ed, like a `chmod 000` directory on disk.
#[derive(Debug, Default)]
pub struct MemoryFs {
    nodes: BTreeMap<PathBuf, Node>,
    denied: BTreeSet<PathBuf>,
    read_dir_calls: AtomicUsize,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(self, path: impl Into<PathBuf>, len: u64) -> Self {
        self.insert(path.into(), Node::File(len))
    }

    pub fn dir(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), Node::Dir)
    }

    pub fn symlink(self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), Node::Symlink(target.into()))
    }

    /// A device, socket or FIFO.
    pub fn special(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), Node::Special)
    }

    pub fn ghost(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), Node::Ghost)
    }

    pub fn broken(self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), Node::Broken)
    }

    pub fn deny(mut self, path: impl Into<PathBuf>) -> Self {
        self.denied.insert(path.into());
        self
    }

    /// Number of `read_dir` calls served so far.
    pub fn read_dir_calls(&self) -> usize {
        self.read_dir_calls.load(Ordering::SeqCst)
    }

    fn insert(mut self, path: PathBuf, node: Node) -> Self {
        for parent in path.ancestors().skip(1) {
            if parent.as_os_str().is_empty() {
                break;
            }
            self.nodes.entry(parent.to_path_buf()).or_insert(Node::Dir);
        }
        self.nodes.insert(path, node);
        self
    }

    /// Finds the stored node for `path`, resolving symlinks in its parents.
    ///
    /// Every symlink followed, in the final component or in any parent, spends
    /// one hop from `hops`; an exhausted budget fails like `ELOOP`.
    fn lookup(&self, path: &Path, hops: &mut usize) -> io::Result<(PathBuf, &Node)> {
        let located = self.locate(path, hops)?;
        match self.nodes.get(&located) {
            Some(Node::Ghost | Node::Broken) | None => Err(not_found(path)),
            Some(node) => Ok((located, node)),
        }
    }

    fn locate(&self, path: &Path, hops: &mut usize) -> io::Result<PathBuf> {
        if self.nodes.contains_key(path) {
            return Ok(path.to_path_buf());
        }
        match (path.parent(), path.file_name()) {
            (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
                let (dir, _) = self.resolve(parent, hops)?;
                Ok(dir.join(name))
            }
            _ => Ok(path.to_path_buf()),
        }
    }

    fn resolve(&self, path: &Path, hops: &mut usize) -> io::Result<(PathBuf, &Node)> {
        let mut current = path.to_path_buf();
        loop {
            match self.lookup(&current, hops)? {
                (_, Node::Symlink(target)) => {
                    if *hops == 0 {
                        return Err(too_many_links(path));
                    }
                    *hops -= 1;
                    current = target.clone();
                }
                found => return Ok(found),
            }
        }
    }
}

impl FileSystem for MemoryFs {
    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let mut hops = MAX_LINK_HOPS;
        let (_, node) = self.resolve(path, &mut hops)?;
        Ok(metadata_of(node))
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        let mut hops = MAX_LINK_HOPS;
        let (_, node) = self.lookup(path, &mut hops)?;
        Ok(metadata_of(node))
    }

    fn read_dir(&self, path: &Path) -> io::Result<DirListing> {
        self.read_dir_calls.fetch_add(1, Ordering::SeqCst);

        let mut hops = MAX_LINK_HOPS;
        let (resolved, node) = self.resolve(path, &mut hops)?;
        if !matches!(node, Node::Dir) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("not a directory: {}", path.display()),
            ));
        }
        if self.denied.contains(&resolved) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }

        let mut listing = DirListing::default();
        for (child, node) in self
            .nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(resolved.as_path()))
        {
            match (node, child.file_name()) {
                (Node::Broken, _) | (_, None) => listing.unreadable += 1,
                (_, Some(name)) => listing.children.push(path.join(name)),
            }
        }
        Ok(listing)
    }
}

fn metadata_of(node: &Node) -> Metadata {
    match node {
        Node::File(len) => Metadata::file(*len),
        Node::Dir => Metadata::of_kind(NodeKind::Directory),
        Node::Symlink(_) => Metadata::of_kind(NodeKind::Symlink),
        Node::Special | Node::Ghost | Node::Broken => Metadata::of_kind(NodeKind::Other),
    }
}

fn too_many_links(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        format!("too many levels of symbolic links: {}", path.display()),
    )
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_are_created_implicitly() -> io::Result<()> {
        let fs = MemoryFs::new().file("/data/sub/b.txt", 50);

        assert_eq!(fs.metadata(Path::new("/data"))?.kind, NodeKind::Directory);
        assert_eq!(fs.read_dir(Path::new("/data"))?.children, vec![PathBuf::from("/data/sub")]);
        assert_eq!(fs.metadata(Path::new("/data/sub/b.txt"))?, Metadata::file(50));
        Ok(())
    }

    #[test]
    fn read_dir_through_symlink_keeps_link_path() -> io::Result<()> {
        let fs = MemoryFs::new()
            .file("/real/x.txt", 1)
            .symlink("/link", "/real");

        assert_eq!(
            fs.read_dir(Path::new("/link"))?.children,
            vec![PathBuf::from("/link/x.txt")]
        );
        assert_eq!(fs.read_dir_calls(), 1);
        Ok(())
    }

    #[test]
    fn ghosts_are_listed_but_cannot_be_stated() -> io::Result<()> {
        let fs = MemoryFs::new().ghost("/data/gone");

        assert_eq!(fs.read_dir(Path::new("/data"))?.children, vec![PathBuf::from("/data/gone")]);
        let err = fs.symlink_metadata(Path::new("/data/gone")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn denied_directory_can_be_stated_but_not_read() {
        let fs = MemoryFs::new().file("/data/locked/secret", 9).deny("/data/locked");

        assert!(fs.exists(Path::new("/data/locked")));
        let err = fs.read_dir(Path::new("/data/locked")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn symlink_cycles_fail_instead_of_looping() {
        let fs = MemoryFs::new().symlink("/a", "/b").symlink("/b", "/a");
        assert!(fs.metadata(Path::new("/a")).is_err());
        assert!(!fs.exists(Path::new("/a")));
    }

    #[test]
    fn symlink_into_its_own_subtree_fails_instead_of_recursing() {
        let fs = MemoryFs::new().symlink("/a", "/a/b");

        let err = fs.metadata(Path::new("/a")).unwrap_err();
        assert!(err.to_string().contains("too many levels of symbolic links"));
        assert!(fs.symlink_metadata(Path::new("/a/b")).is_err());
        assert!(fs.read_dir(Path::new("/a")).is_err());
    }

    #[test]
    fn broken_entries_are_counted_not_listed() -> io::Result<()> {
        let fs = MemoryFs::new().file("/data/ok", 3).broken("/data/bad");

        let listing = fs.read_dir(Path::new("/data"))?;
        assert_eq!(listing.children, vec![PathBuf::from("/data/ok")]);
        assert_eq!(listing.unreadable, 1);
        Ok(())
    }
}
