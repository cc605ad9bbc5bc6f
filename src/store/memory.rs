//! In-memory arena store.

use std::collections::HashMap;

use crate::core::{AttrValue, Attributes, NodeId, NodeKind, Store};
use crate::util::{Error, NdArray, Result};

#[derive(Debug)]
enum Payload {
    Group {
        /// Children in creation order.
        children: Vec<NodeId>,
        by_name: HashMap<String, NodeId>,
    },
    Dataset(NdArray),
}

#[derive(Debug)]
struct Node {
    name: String,
    attrs: Attributes,
    payload: Payload,
}

/// A [`Store`] holding the whole tree in memory.
///
/// Nodes live in an arena indexed by [`NodeId`]. Unlinked nodes leave a
/// hole, so ids of surviving nodes stay valid.
#[derive(Debug)]
pub struct MemStore {
    nodes: Vec<Option<Node>>,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    /// An empty tree holding only the root group.
    pub fn new() -> Self {
        let root = Node {
            name: String::new(),
            attrs: Attributes::new(),
            payload: empty_group(),
        };
        Self { nodes: vec![Some(root)] }
    }

    /// A tree holding the root and one empty top-level group.
    pub(crate) fn with_top_group(name: &str) -> (Self, NodeId) {
        let mut store = Self::new();
        let id = NodeId(store.nodes.len());
        if let Some(Some(Node { payload: Payload::Group { children, by_name }, .. })) = store.nodes.first_mut() {
            children.push(id);
            by_name.insert(name.to_string(), id);
        }
        store.nodes.push(Some(Node {
            name: name.to_string(),
            attrs: Attributes::new(),
            payload: empty_group(),
        }));
        (store, id)
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Name of a node (empty for the root).
    pub fn name(&self, node: NodeId) -> Result<&str> {
        Ok(&self.node(node)?.name)
    }

    /// Child ids of a group, in creation order.
    pub fn children(&self, parent: NodeId) -> Result<&[NodeId]> {
        match &self.node(parent)?.payload {
            Payload::Group { children, .. } => Ok(children),
            Payload::Dataset(_) => Err(not_a_group(parent)),
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::NotFound(format!("node {:?}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::NotFound(format!("node {:?}", id)))
    }

    fn insert(&mut self, parent: NodeId, name: &str, payload: Payload) -> Result<NodeId> {
        if name.is_empty() || name.contains('/') {
            return Err(Error::other(format!("invalid node name \"{}\"", name)));
        }
        let id = NodeId(self.nodes.len());
        match &mut self.node_mut(parent)?.payload {
            Payload::Group { children, by_name } => {
                if by_name.contains_key(name) {
                    return Err(Error::DuplicateKey(name.to_string()));
                }
                children.push(id);
                by_name.insert(name.to_string(), id);
            }
            Payload::Dataset(_) => return Err(not_a_group(parent)),
        }
        self.nodes.push(Some(Node {
            name: name.to_string(),
            attrs: Attributes::new(),
            payload,
        }));
        Ok(id)
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        if let Payload::Group { children, .. } = node.payload {
            for child in children {
                self.drop_subtree(child);
            }
        }
    }
}

fn empty_group() -> Payload {
    Payload::Group {
        children: Vec::new(),
        by_name: HashMap::new(),
    }
}

fn not_a_group(id: NodeId) -> Error {
    Error::other(format!("node {:?} is not a group", id))
}

impl Store for MemStore {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).ok().map(|n| match n.payload {
            Payload::Group { .. } => NodeKind::Group,
            Payload::Dataset(_) => NodeKind::Dataset,
        })
    }

    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        match &self.node(parent).ok()?.payload {
            Payload::Group { by_name, .. } => by_name.get(name).copied(),
            Payload::Dataset(_) => None,
        }
    }

    fn child_names(&self, parent: NodeId) -> Result<Vec<String>> {
        self.children(parent)?
            .iter()
            .map(|&id| self.name(id).map(str::to_string))
            .collect()
    }

    fn create_group(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        self.insert(parent, name, empty_group())
    }

    fn create_dataset(&mut self, parent: NodeId, name: &str, data: NdArray) -> Result<NodeId> {
        self.insert(parent, name, Payload::Dataset(data))
    }

    fn dataset(&self, node: NodeId) -> Result<&NdArray> {
        match &self.node(node)?.payload {
            Payload::Dataset(data) => Ok(data),
            Payload::Group { .. } => Err(Error::other(format!("node {:?} is not a dataset", node))),
        }
    }

    fn attrs(&self, node: NodeId) -> Result<&Attributes> {
        Ok(&self.node(node)?.attrs)
    }

    fn set_attr(&mut self, node: NodeId, key: &str, value: AttrValue) -> Result<()> {
        self.node_mut(node)?.attrs.set(key, value);
        Ok(())
    }

    fn unlink(&mut self, parent: NodeId, name: &str) -> Result<()> {
        let removed = match &mut self.node_mut(parent)?.payload {
            Payload::Group { children, by_name } => {
                let id = by_name
                    .remove(name)
                    .ok_or_else(|| Error::NotFound(name.to_string()))?;
                children.retain(|&c| c != id);
                id
            }
            Payload::Dataset(_) => return Err(not_a_group(parent)),
        };
        self.drop_subtree(removed);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_keep_creation_order() {
        let mut store = MemStore::new();
        let root = store.root();
        for name in ["b", "a", "c"] {
            store.create_group(root, name).unwrap();
        }
        assert_eq!(store.child_names(root).unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_name() {
        let mut store = MemStore::new();
        let root = store.root();
        store.create_group(root, "data").unwrap();
        let err = store
            .create_dataset(root, "data", NdArray::scalar(1u8))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(name) if name == "data"));
    }

    #[test]
    fn test_dataset_is_a_leaf() {
        let mut store = MemStore::new();
        let root = store.root();
        let leaf = store.create_dataset(root, "x", NdArray::scalar(1.5f32)).unwrap();
        assert_eq!(store.node_kind(leaf), Some(NodeKind::Dataset));
        assert!(store.create_group(leaf, "y").is_err());
        assert!(store.child(leaf, "y").is_none());
        assert_eq!(store.dataset(leaf).unwrap().scalar_value::<f32>(), Some(1.5));
    }

    #[test]
    fn test_unlink_drops_subtree() {
        let mut store = MemStore::new();
        let root = store.root();
        let header = store.create_group(root, "header").unwrap();
        let length = store.create_dataset(header, "length", NdArray::scalar(3i64)).unwrap();
        assert_eq!(store.node_count(), 3);

        store.unlink(root, "header").unwrap();
        assert_eq!(store.node_count(), 1);
        assert!(store.node_kind(length).is_none());
        assert!(store.child_names(root).unwrap().is_empty());
        assert!(matches!(store.unlink(root, "header"), Err(Error::NotFound(_))));

        // The name is free again.
        store.create_group(root, "header").unwrap();
    }

    #[test]
    fn test_resolve_and_attrs() {
        let mut store = MemStore::new();
        let root = store.root();
        let data = store.create_group(root, "data").unwrap();
        let frame = store.create_group(data, "0").unwrap();
        store.set_attr(frame, "type", "pose".into()).unwrap();

        assert_eq!(store.resolve("/data/0"), Some(frame));
        assert_eq!(store.resolve("data/0/"), Some(frame));
        assert_eq!(store.resolve("/"), Some(root));
        assert_eq!(store.resolve("/data/1"), None);
        assert_eq!(store.attrs(frame).unwrap().get_str("type"), Some("pose"));
    }

    #[test]
    fn test_with_top_group() {
        let (store, data) = MemStore::with_top_group("data");
        assert_eq!(store.resolve("/data"), Some(data));
        assert_eq!(store.node_kind(data), Some(NodeKind::Group));
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn test_rejects_bad_names() {
        let mut store = MemStore::new();
        let root = store.root();
        assert!(store.create_group(root, "").is_err());
        assert!(store.create_group(root, "a/b").is_err());
    }
}
