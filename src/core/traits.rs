//! The storage capability trait and the group handle built on it.
//!
//! Codecs and the container index only ever talk to a [`Store`] through
//! these few operations, so any hierarchical attributed store can back
//! a container without touching the encode logic.

use crate::codec::Encode;
use crate::core::{AttrValue, Attributes};
use crate::util::{Error, NdArray, Result};

/// Handle to a node inside a [`Store`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node flavor: an inner group or a dataset leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Dataset,
}

/// Hierarchical attributed store: a tree of named groups holding named
/// dataset leaves, with attributes on every node.
pub trait Store {
    /// The root group.
    fn root(&self) -> NodeId;

    /// Kind of a node, or None for a stale id.
    fn node_kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Look up a direct child by name.
    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId>;

    /// Names of all direct children, in creation order.
    fn child_names(&self, parent: NodeId) -> Result<Vec<String>>;

    /// Create a child group. Fails with `DuplicateKey` if the name is taken.
    fn create_group(&mut self, parent: NodeId, name: &str) -> Result<NodeId>;

    /// Create a child dataset leaf. Fails with `DuplicateKey` if the name is taken.
    fn create_dataset(&mut self, parent: NodeId, name: &str, data: NdArray) -> Result<NodeId>;

    /// Payload of a dataset leaf.
    fn dataset(&self, node: NodeId) -> Result<&NdArray>;

    /// Attributes of any node.
    fn attrs(&self, node: NodeId) -> Result<&Attributes>;

    /// Set one attribute on any node.
    fn set_attr(&mut self, node: NodeId, key: &str, value: AttrValue) -> Result<()>;

    /// Remove a child (and its subtree) from a group.
    fn unlink(&mut self, parent: NodeId, name: &str) -> Result<()>;

    /// Flush and release the underlying resource.
    fn close(&mut self) -> Result<()>;

    /// Resolve a slash-separated path from the root.
    fn resolve(&self, path: &str) -> Option<NodeId> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self.root(), |node, name| self.child(node, name))
    }
}

/// Mutable handle to one group of a store.
///
/// Obtained from the container index; record codecs populate it.
pub struct Group<'a> {
    store: &'a mut dyn Store,
    id: NodeId,
}

impl<'a> Group<'a> {
    /// Wrap a group node. Fails if `id` is not a group.
    pub fn new(store: &'a mut dyn Store, id: NodeId) -> Result<Self> {
        match store.node_kind(id) {
            Some(NodeKind::Group) => Ok(Self { store, id }),
            Some(NodeKind::Dataset) => Err(Error::other(format!("node {:?} is a dataset", id))),
            None => Err(Error::NotFound(format!("node {:?}", id))),
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read access to the whole store.
    pub fn store(&self) -> &dyn Store {
        &*self.store
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.child(self.id, name).is_some()
    }

    pub fn child_names(&self) -> Result<Vec<String>> {
        self.store.child_names(self.id)
    }

    pub fn attrs(&self) -> Result<&Attributes> {
        self.store.attrs(self.id)
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<AttrValue>) -> Result<()> {
        self.store.set_attr(self.id, key, value.into())
    }

    /// Create a child group carrying `attrs`.
    pub fn create_group(&mut self, name: &str, attrs: Attributes) -> Result<Group<'_>> {
        let id = self.store.create_group(self.id, name)?;
        write_attrs(&mut *self.store, id, attrs)?;
        Ok(Group { store: &mut *self.store, id })
    }

    /// Open a child group, creating it if it does not exist yet.
    pub fn require_group(&mut self, name: &str) -> Result<Group<'_>> {
        let id = match self.store.child(self.id, name) {
            Some(id) => id,
            None => self.store.create_group(self.id, name)?,
        };
        Group::new(&mut *self.store, id)
    }

    /// Create a child dataset carrying `attrs`.
    pub fn create_dataset(&mut self, name: &str, data: NdArray, attrs: Attributes) -> Result<NodeId> {
        let id = self.store.create_dataset(self.id, name, data)?;
        write_attrs(&mut *self.store, id, attrs)?;
        Ok(id)
    }

    /// Encode one record under `tag`.
    pub fn write<R: Encode + ?Sized>(&mut self, tag: &str, record: &R) -> Result<()> {
        record.encode(self, tag)
    }
}

fn write_attrs(store: &mut dyn Store, id: NodeId, attrs: Attributes) -> Result<()> {
    for (key, value) in attrs.iter() {
        store.set_attr(id, key, value.clone())?;
    }
    Ok(())
}
