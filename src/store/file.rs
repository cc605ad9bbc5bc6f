//! File-backed store.
//!
//! The tree is held in a [`MemStore`] while the container is open and
//! written out as one image on close. Append mode loads the existing
//! image first.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::{debug, warn};

use super::image::{read_image, write_image};
use super::MemStore;
use crate::container::{ContainerOptions, Mode};
use crate::core::{AttrValue, Attributes, NodeId, NodeKind, Store};
use crate::util::{Error, NdArray, Result};

/// A [`Store`] persisted to a single file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    options: ContainerOptions,
    tree: MemStore,
    closed: bool,
}

impl FileStore {
    /// Open `path` according to `options`.
    ///
    /// Fails with `DirectoryNotFound` when the parent directory is missing.
    /// Write mode truncates the file right away.
    pub fn open(path: impl AsRef<Path>, options: ContainerOptions) -> Result<Self> {
        let path = Self::check_destination(path)?;

        let tree = match options.mode() {
            Mode::Write => {
                File::create(&path)?;
                MemStore::new()
            }
            Mode::Append if path.exists() => load(&path)?,
            Mode::Append => MemStore::new(),
        };
        debug!(path = %path.display(), mode = %options.mode(), nodes = tree.node_count(), "opened container file");

        Ok(Self { path, options, tree, closed: false })
    }

    /// Absolute form of `path`, or `DirectoryNotFound` if its parent
    /// directory does not exist.
    pub fn check_destination(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = absolute(path.as_ref())?;
        check_parent(&path)?;
        Ok(path)
    }

    /// Load a container file read-only into memory.
    pub fn read(path: impl AsRef<Path>) -> Result<MemStore> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        load(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// The in-memory tree.
    pub fn tree(&self) -> &MemStore {
        &self.tree
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn flush(&self) -> Result<()> {
        let image = write_image(&self.tree, self.options.compression())?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&image)?;
        writer.flush()?;
        debug!(path = %self.path.display(), bytes = image.len(), "wrote container file");
        Ok(())
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Finalized);
        }
        Ok(())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        if !self.closed {
            warn!(path = %self.path.display(), "container file dropped without close, nothing written");
        }
    }
}

impl Store for FileStore {
    fn root(&self) -> NodeId {
        self.tree.root()
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.tree.node_kind(node)
    }

    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.tree.child(parent, name)
    }

    fn child_names(&self, parent: NodeId) -> Result<Vec<String>> {
        self.tree.child_names(parent)
    }

    fn create_group(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        self.check_open()?;
        self.tree.create_group(parent, name)
    }

    fn create_dataset(&mut self, parent: NodeId, name: &str, data: NdArray) -> Result<NodeId> {
        self.check_open()?;
        self.tree.create_dataset(parent, name, data)
    }

    fn dataset(&self, node: NodeId) -> Result<&NdArray> {
        self.tree.dataset(node)
    }

    fn attrs(&self, node: NodeId) -> Result<&Attributes> {
        self.tree.attrs(node)
    }

    fn set_attr(&mut self, node: NodeId, key: &str, value: AttrValue) -> Result<()> {
        self.check_open()?;
        self.tree.set_attr(node, key, value)
    }

    fn unlink(&mut self, parent: NodeId, name: &str) -> Result<()> {
        self.check_open()?;
        self.tree.unlink(parent, name)
    }

    /// Write the image. Closing twice is a no-op.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.flush()?;
        self.closed = true;
        Ok(())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn check_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.is_dir() => Err(Error::DirectoryNotFound(dir.to_path_buf())),
        _ => Ok(()),
    }
}

fn load(path: &Path) -> Result<MemStore> {
    let file = File::open(path)?;
    let size = fs::metadata(path)?.len();
    if size == 0 {
        // Created in write mode and never closed.
        return Ok(MemStore::new());
    }
    // Safety: the file is opened read-only and the map is dropped before
    // this store writes the file again.
    let mmap = unsafe { Mmap::map(&file) }?;
    read_image(&mmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("out.sbox");
        let err = FileStore::open(&path, ContainerOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(p) if p.ends_with("nope")));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.sbox");

        let mut store = FileStore::open(&path, ContainerOptions::default()).unwrap();
        assert!(path.exists());
        let root = store.root();
        let g = store.create_group(root, "calib").unwrap();
        store.set_attr(g, "frame_id", "cam".into()).unwrap();
        store.close().unwrap();
        store.close().unwrap();
        assert!(matches!(store.create_group(root, "late"), Err(Error::Finalized)));

        let loaded = FileStore::read(&path).unwrap();
        let calib = loaded.resolve("/calib").unwrap();
        assert_eq!(loaded.attrs(calib).unwrap().get_str("frame_id"), Some("cam"));
    }

    #[test]
    fn test_append_keeps_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.sbox");

        let mut store = FileStore::open(&path, ContainerOptions::new().with_compression(6)).unwrap();
        let root = store.root();
        store.create_group(root, "first").unwrap();
        store.close().unwrap();

        let append = ContainerOptions::new().with_mode(Mode::Append);
        let mut store = FileStore::open(&path, append).unwrap();
        assert!(store.resolve("/first").is_some());
        let root = store.root();
        store.create_group(root, "second").unwrap();
        store.close().unwrap();

        let loaded = FileStore::read(&path).unwrap();
        assert_eq!(loaded.child_names(loaded.root()).unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_append_to_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh.sbox");
        let store = FileStore::open(&path, ContainerOptions::new().with_mode(Mode::Append)).unwrap();
        assert_eq!(store.tree().node_count(), 1);
        assert!(!path.exists());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(FileStore::read(dir.path().join("x")), Err(Error::NotFound(_))));
    }
}
