//! JSON rendering of a store tree, for debugging and inspection.

use serde_json::{json, Map, Value};

use crate::core::{AttrValue, Attributes, NodeId, NodeKind, Store};
use crate::util::{ArrayData, Error, NdArray, Result};

/// Render the whole tree of `store`.
///
/// Groups become `{"attrs": .., "children": {..}}`, datasets become
/// `{"attrs": .., "dtype": .., "shape": [..]}` plus a `value` for 0-d
/// numbers and single strings. Bulk payloads are never dumped.
pub fn to_json(store: &dyn Store) -> Result<Value> {
    node_json(store, store.root())
}

/// Render the subtree at a slash-separated path.
pub fn path_to_json(store: &dyn Store, path: &str) -> Result<Value> {
    let node = store
        .resolve(path)
        .ok_or_else(|| Error::NotFound(path.to_string()))?;
    node_json(store, node)
}

fn node_json(store: &dyn Store, node: NodeId) -> Result<Value> {
    let attrs = attrs_json(store.attrs(node)?);
    match store.node_kind(node) {
        Some(NodeKind::Group) => {
            let mut children = Map::new();
            for name in store.child_names(node)? {
                let child = store
                    .child(node, &name)
                    .ok_or_else(|| Error::NotFound(name.clone()))?;
                children.insert(name, node_json(store, child)?);
            }
            Ok(json!({ "attrs": attrs, "children": children }))
        }
        Some(NodeKind::Dataset) => {
            let array = store.dataset(node)?;
            let mut obj = Map::new();
            obj.insert("attrs".into(), attrs);
            obj.insert("dtype".into(), json!(array.element_type().name()));
            obj.insert("shape".into(), json!(array.shape().sizes()));
            if let Some(value) = inline_value(array) {
                obj.insert("value".into(), value);
            }
            Ok(Value::Object(obj))
        }
        None => Err(Error::NotFound(format!("node {:?}", node))),
    }
}

fn attrs_json(attrs: &Attributes) -> Value {
    let map = attrs
        .iter()
        .map(|(k, v)| {
            let v = match v {
                AttrValue::Int(i) => json!(i),
                AttrValue::Float(f) => json!(f),
                AttrValue::Str(s) => json!(s),
                AttrValue::IntArray(a) => json!(a),
                AttrValue::FloatArray(a) => json!(a),
            };
            (k.to_string(), v)
        })
        .collect::<Map<_, _>>();
    Value::Object(map)
}

fn inline_value(array: &NdArray) -> Option<Value> {
    if let Some(s) = array.as_str() {
        return Some(json!(s));
    }
    if !array.shape().is_scalar() {
        return None;
    }
    let v = match array.data() {
        ArrayData::Uint8(v) => json!(v.first()?),
        ArrayData::Int8(v) => json!(v.first()?),
        ArrayData::Uint16(v) => json!(v.first()?),
        ArrayData::Int16(v) => json!(v.first()?),
        ArrayData::Uint32(v) => json!(v.first()?),
        ArrayData::Int32(v) => json!(v.first()?),
        ArrayData::Uint64(v) => json!(v.first()?),
        ArrayData::Int64(v) => json!(v.first()?),
        ArrayData::Float16(v) => json!(v.first()?.to_f32()),
        ArrayData::Float32(v) => json!(v.first()?),
        ArrayData::Float64(v) => json!(v.first()?),
        _ => return None,
    };
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    #[test]
    fn test_dump_tree() {
        let mut store = MemStore::new();
        let root = store.root();
        let header = store.create_group(root, "header").unwrap();
        store
            .create_dataset(header, "length", NdArray::scalar(2i64))
            .unwrap();
        let data = store.create_group(root, "data").unwrap();
        let frame = store.create_group(data, "0").unwrap();
        let img = store
            .create_dataset(frame, "camera", NdArray::from_vec((2, 2), vec![0u8; 4]).unwrap())
            .unwrap();
        store.set_attr(img, "type", "mono8".into()).unwrap();

        let v = to_json(&store).unwrap();
        assert_eq!(v["children"]["header"]["children"]["length"]["value"], json!(2));
        let camera = &v["children"]["data"]["children"]["0"]["children"]["camera"];
        assert_eq!(camera["dtype"], json!("uint8"));
        assert_eq!(camera["shape"], json!([2, 2]));
        assert_eq!(camera["attrs"]["type"], json!("mono8"));
        assert!(camera.get("value").is_none());

        let frame = path_to_json(&store, "/data/0").unwrap();
        assert!(frame["children"].get("camera").is_some());
        assert!(matches!(path_to_json(&store, "/data/9"), Err(Error::NotFound(_))));
    }
}
