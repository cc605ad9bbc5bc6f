//! Container index: frame, label and common-group addressing.
//!
//! A container's root holds three reserved groups:
//!
//! ```text
//! /data/<index>/<record>        indexed frames
//! /label/<tag>/<index>/...      label dictionaries
//! /header/length                frame count, written by finalize
//! /<tag>/<record>               common (non-indexed) groups
//! ```
//!
//! The container never looks inside records; it hands out [`Group`]
//! handles and the record codecs fill them.

mod options;

pub use options::{ContainerOptions, Mode};

use std::path::Path;

use tracing::{debug, trace};

use crate::core::{Attributes, Group, NodeId, NodeKind, Store};
use crate::schema::keys::{is_reserved, KEY_DATA, KEY_HEADER, KEY_LABEL, KEY_LENGTH};
use crate::store::{FileStore, MemStore};
use crate::util::{Error, NdArray, Result};

/// A sensor data container over a [`Store`].
///
/// Frames are addressed by a write cursor: [`current_frame`](Self::current_frame)
/// starts at frame 0, [`next_frame`](Self::next_frame) advances it and
/// [`frame_at`](Self::frame_at) jumps back to an existing frame.
/// [`finalize`](Self::finalize) writes the header and closes the store;
/// every later call fails with [`Error::Finalized`].
#[derive(Debug)]
pub struct Container<S: Store = MemStore> {
    store: S,
    data: NodeId,
    cursor: Option<u64>,
    finalized: bool,
}

impl Container<MemStore> {
    /// A container over a fresh in-memory store.
    pub fn in_memory() -> Self {
        let (store, data) = MemStore::with_top_group(KEY_DATA);
        Self {
            store,
            data,
            cursor: None,
            finalized: false,
        }
    }
}

impl Container<FileStore> {
    /// Create (or truncate) a container file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ContainerOptions::default())
    }

    /// Open a container file with mode `"w"` (truncate) or `"a"` (append).
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Self> {
        let path = FileStore::check_destination(path)?;
        let mode: Mode = mode.parse()?;
        Self::open_with(path, ContainerOptions::new().with_mode(mode))
    }

    pub fn open_with(path: impl AsRef<Path>, options: ContainerOptions) -> Result<Self> {
        Self::from_store(FileStore::open(path, options)?)
    }
}

impl<S: Store> Container<S> {
    /// Wrap an existing store. An existing `/data` group is reused.
    pub fn from_store(mut store: S) -> Result<Self> {
        let root = store.root();
        let data = require_group(&mut store, root, KEY_DATA)?;
        if store.node_kind(data) != Some(NodeKind::Group) {
            return Err(Error::invalid(format!("/{} is not a group", KEY_DATA)));
        }
        debug!(existing_frames = store.child_names(data)?.len(), "opened container");
        Ok(Self {
            store,
            data,
            cursor: None,
            finalized: false,
        })
    }

    /// The frame under the cursor, creating frame 0 on first use.
    pub fn current_frame(&mut self) -> Result<Group<'_>> {
        self.check_open()?;
        let index = self.cursor.unwrap_or(0);
        let id = self.require_frame(index)?;
        self.cursor = Some(index);
        Group::new(&mut self.store, id)
    }

    /// Advance the cursor and return that frame, creating it if needed.
    pub fn next_frame(&mut self) -> Result<Group<'_>> {
        self.check_open()?;
        let index = self.cursor.map_or(0, |c| c + 1);
        let id = self.require_frame(index)?;
        self.cursor = Some(index);
        Group::new(&mut self.store, id)
    }

    /// Move the cursor to an existing frame.
    ///
    /// Fails with `OutOfRange` unless `0 <= index <= max_frame_index()`;
    /// the cursor is left alone on failure.
    pub fn frame_at(&mut self, index: i64) -> Result<Group<'_>> {
        self.check_open()?;
        let max = match self.max_frame_index() {
            Ok(max) => max,
            Err(Error::NoFrames) => return Err(Error::OutOfRange { index, max: None }),
            Err(e) => return Err(e),
        };
        let target = u64::try_from(index)
            .ok()
            .filter(|&i| i <= max)
            .ok_or(Error::OutOfRange { index, max: Some(max) })?;
        let id = self
            .store
            .child(self.data, &target.to_string())
            .ok_or_else(|| Error::NotFound(format!("/{}/{}", KEY_DATA, target)))?;
        let group = Group::new(&mut self.store, id)?;
        self.cursor = Some(target);
        trace!(index = target, "moved cursor");
        Ok(group)
    }

    /// Frame index under the cursor, None before the first frame call.
    #[inline]
    pub fn current_index(&self) -> Option<u64> {
        self.cursor
    }

    /// Largest frame index present under `/data`.
    ///
    /// Names that are not decimal integers are ignored.
    pub fn max_frame_index(&self) -> Result<u64> {
        self.check_open()?;
        self.store
            .child_names(self.data)?
            .iter()
            .filter_map(|name| name.parse::<u64>().ok())
            .max()
            .ok_or(Error::NoFrames)
    }

    /// The label dictionary `/label/<tag>`, created on first use.
    pub fn label_group(&mut self, tag: &str) -> Result<Group<'_>> {
        self.check_open()?;
        if tag.is_empty() {
            return Err(Error::EmptyTag);
        }
        let root = self.store.root();
        let labels = require_group(&mut self.store, root, KEY_LABEL)?;
        let id = require_group(&mut self.store, labels, tag)?;
        Group::new(&mut self.store, id)
    }

    /// The common group `/<tag>`, created on first use.
    ///
    /// `header`, `data` and `label` are reserved.
    pub fn common_group(&mut self, tag: &str) -> Result<Group<'_>> {
        self.check_open()?;
        if is_reserved(tag) {
            return Err(Error::ReservedName(tag.to_string()));
        }
        let root = self.store.root();
        let id = require_group(&mut self.store, root, tag)?;
        Group::new(&mut self.store, id)
    }

    /// Write `/header/length`, close the store and end the container's
    /// life. The length is `max_frame_index() + 1`, or 0 without frames.
    /// An existing header is replaced.
    pub fn finalize(&mut self) -> Result<()> {
        self.check_open()?;
        let length = match self.max_frame_index() {
            Ok(max) => max + 1,
            Err(Error::NoFrames) => 0,
            Err(e) => return Err(e),
        };

        let root = self.store.root();
        if self.store.child(root, KEY_HEADER).is_some() {
            self.store.unlink(root, KEY_HEADER)?;
        }
        let length = i64::try_from(length)
            .map_err(|_| Error::other(format!("frame count {} exceeds int64", length)))?;
        {
            let mut root_group = Group::new(&mut self.store, root)?;
            let mut header = root_group.create_group(KEY_HEADER, Attributes::new())?;
            header.create_dataset(KEY_LENGTH, NdArray::scalar(length), Attributes::new())?;
        }

        self.store.close()?;
        self.finalized = true;
        self.cursor = None;
        debug!(length, "finalized container");
        Ok(())
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give up the container and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn require_frame(&mut self, index: u64) -> Result<NodeId> {
        let name = index.to_string();
        if let Some(id) = self.store.child(self.data, &name) {
            return Ok(id);
        }
        trace!(index, "creating frame");
        self.store.create_group(self.data, &name)
    }

    fn check_open(&self) -> Result<()> {
        if self.finalized {
            return Err(Error::Finalized);
        }
        Ok(())
    }
}

/// Look up a child group, creating it if missing.
fn require_group(store: &mut dyn Store, parent: NodeId, name: &str) -> Result<NodeId> {
    match store.child(parent, name) {
        Some(id) => Ok(id),
        None => {
            trace!(name, "creating group");
            store.create_group(parent, name)
        }
    }
}
