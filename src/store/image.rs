//! Serialization of a node tree into a container image and back.

use std::io::Write;

use tracing::debug;

use super::format::*;
use super::stream::{IStream, OStream};
use super::MemStore;
use crate::core::{compress, decompress, AttrValue, Attributes, NodeId, NodeKind, Store};
use crate::util::{
    ArrayData, ElementType, Error, LabeledVoxelPoint, NdArray, Result, Shape, VoxelPoint,
};

/// Maximum nesting accepted by the reader.
const MAX_DEPTH: usize = 64;

/// Serialize the whole tree of `store` into a complete image.
pub fn write_image(store: &dyn Store, compression: Option<flate2::Compression>) -> Result<Vec<u8>> {
    let mut body = OStream::new(Vec::new());
    write_node(&mut body, store, store.root(), "")?;
    let body = body.into_inner();

    let (flags, body) = match compression {
        Some(level) => (FLAG_COMPRESSED, compress(&body, level)?),
        None => (0, body),
    };

    let mut out = OStream::new(Vec::with_capacity(HEADER_SIZE + body.len()));
    write_header(
        &mut out,
        &ImageHeader {
            flags,
            version: CURRENT_VERSION,
            body_size: body.len() as u64,
        },
    )?;
    out.write_bytes(&body)?;
    debug!(bytes = out.pos(), compressed = flags != 0, "serialized container image");
    Ok(out.into_inner())
}

/// Parse a complete image into an in-memory tree.
pub fn read_image(data: &[u8]) -> Result<MemStore> {
    let header = parse_header(data)?;
    let end = (HEADER_SIZE as u64)
        .checked_add(header.body_size)
        .filter(|&end| end <= data.len() as u64)
        .ok_or_else(|| {
            Error::invalid(format!(
                "body of {} bytes overruns a {} byte image",
                header.body_size,
                data.len()
            ))
        })?;
    let raw = &data[HEADER_SIZE..end as usize];

    let inflated;
    let body = if header.is_compressed() {
        inflated = decompress(raw)?;
        inflated.as_slice()
    } else {
        raw
    };

    let mut input = IStream::new(body);
    let mut store = MemStore::new();
    let root = store.root();
    read_root(&mut input, &mut store, root)?;
    if input.remaining() != 0 {
        return Err(Error::invalid(format!("{} trailing bytes after tree", input.remaining())));
    }
    debug!(nodes = store.node_count(), "loaded container image");
    Ok(store)
}

fn write_header<W: Write>(out: &mut OStream<W>, header: &ImageHeader) -> Result<()> {
    out.write_bytes(MAGIC)?;
    out.write_u8(header.flags)?;
    out.write_u16(header.version)?;
    out.write_u64(header.body_size)
}

/// Parse and validate the image header.
pub fn parse_header(data: &[u8]) -> Result<ImageHeader> {
    if data.len() < HEADER_SIZE {
        return Err(Error::invalid(format!("image of {} bytes has no header", data.len())));
    }
    if &data[..FLAGS_OFFSET] != MAGIC {
        return Err(Error::invalid("bad magic"));
    }
    let mut input = IStream::new(&data[FLAGS_OFFSET..HEADER_SIZE]);
    let flags = input.read_u8()?;
    let version = input.read_u16()?;
    let body_size = input.read_u64()?;
    if version > CURRENT_VERSION {
        return Err(Error::invalid(format!("unsupported image version {}", version)));
    }
    Ok(ImageHeader { flags, version, body_size })
}

fn write_node<W: Write>(out: &mut OStream<W>, store: &dyn Store, id: NodeId, name: &str) -> Result<()> {
    let kind = store
        .node_kind(id)
        .ok_or_else(|| Error::NotFound(format!("node {:?}", id)))?;
    out.write_u8(match kind {
        NodeKind::Group => NODE_GROUP,
        NodeKind::Dataset => NODE_DATASET,
    })?;
    out.write_str(name)?;
    write_attrs(out, store.attrs(id)?)?;

    match kind {
        NodeKind::Group => {
            let names = store.child_names(id)?;
            out.write_len(names.len())?;
            for child_name in &names {
                let child = store
                    .child(id, child_name)
                    .ok_or_else(|| Error::NotFound(child_name.clone()))?;
                write_node(out, store, child, child_name)?;
            }
            Ok(())
        }
        NodeKind::Dataset => write_array(out, store.dataset(id)?),
    }
}

fn write_attrs<W: Write>(out: &mut OStream<W>, attrs: &Attributes) -> Result<()> {
    out.write_len(attrs.len())?;
    for (key, value) in attrs.iter() {
        out.write_str(key)?;
        match value {
            AttrValue::Int(v) => {
                out.write_u8(ATTR_INT)?;
                out.write_i64(*v)?;
            }
            AttrValue::Float(v) => {
                out.write_u8(ATTR_FLOAT)?;
                out.write_f64(*v)?;
            }
            AttrValue::Str(s) => {
                out.write_u8(ATTR_STR)?;
                out.write_str(s)?;
            }
            AttrValue::IntArray(v) => {
                out.write_u8(ATTR_INT_ARRAY)?;
                out.write_len(v.len())?;
                for x in v {
                    out.write_i64(*x)?;
                }
            }
            AttrValue::FloatArray(v) => {
                out.write_u8(ATTR_FLOAT_ARRAY)?;
                out.write_len(v.len())?;
                for x in v {
                    out.write_f64(*x)?;
                }
            }
        }
    }
    Ok(())
}

fn write_array<W: Write>(out: &mut OStream<W>, array: &NdArray) -> Result<()> {
    out.write_u8(array.element_type() as u8)?;
    out.write_len(array.rank())?;
    for &dim in array.shape().sizes() {
        out.write_u64(dim as u64)?;
    }

    match array.data() {
        ArrayData::String(values) => {
            for s in values {
                out.write_str(s)?;
            }
        }
        ArrayData::PointList(cells) => {
            for cell in cells {
                out.write_len(cell.len())?;
                for p in cell {
                    out.write_f32(p.x)?;
                    out.write_f32(p.y)?;
                    out.write_f32(p.z)?;
                }
            }
        }
        ArrayData::LabeledPointList(cells) => {
            for cell in cells {
                out.write_len(cell.len())?;
                for p in cell {
                    out.write_f32(p.x)?;
                    out.write_f32(p.y)?;
                    out.write_f32(p.z)?;
                    out.write_u8(p.label)?;
                }
            }
        }
        numeric => {
            let bytes = numeric
                .to_le_bytes()
                .ok_or_else(|| Error::other(format!("{} has no flat byte layout", numeric.element_type())))?;
            out.write_u64(bytes.len() as u64)?;
            out.write_bytes(&bytes)?;
        }
    }
    Ok(())
}

fn read_root(input: &mut IStream<'_>, store: &mut MemStore, root: NodeId) -> Result<()> {
    if input.read_u8()? != NODE_GROUP {
        return Err(Error::invalid("root node is not a group"));
    }
    // Root name is always empty.
    input.read_str()?;
    read_attrs_into(input, store, root)?;
    read_children(input, store, root, 1)
}

fn read_children(input: &mut IStream<'_>, store: &mut MemStore, parent: NodeId, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::invalid("tree nesting too deep"));
    }
    let count = input.read_len(1)?;
    for _ in 0..count {
        let tag = input.read_u8()?;
        let name = input.read_str()?;
        let attrs = read_attrs(input)?;
        let id = match tag {
            NODE_GROUP => {
                let id = store.create_group(parent, &name)?;
                read_children(input, store, id, depth + 1)?;
                id
            }
            NODE_DATASET => {
                let array = read_array(input)?;
                store.create_dataset(parent, &name, array)?
            }
            other => return Err(Error::invalid(format!("unknown node tag {}", other))),
        };
        for (key, value) in attrs.iter() {
            store.set_attr(id, key, value.clone())?;
        }
    }
    Ok(())
}

fn read_attrs_into(input: &mut IStream<'_>, store: &mut MemStore, id: NodeId) -> Result<()> {
    for (key, value) in read_attrs(input)?.iter() {
        store.set_attr(id, key, value.clone())?;
    }
    Ok(())
}

fn read_attrs(input: &mut IStream<'_>) -> Result<Attributes> {
    let count = input.read_len(5)?;
    let mut attrs = Attributes::new();
    for _ in 0..count {
        let key = input.read_str()?;
        let value = match input.read_u8()? {
            ATTR_INT => AttrValue::Int(input.read_i64()?),
            ATTR_FLOAT => AttrValue::Float(input.read_f64()?),
            ATTR_STR => AttrValue::Str(input.read_str()?),
            ATTR_INT_ARRAY => {
                let n = input.read_len(8)?;
                AttrValue::IntArray((0..n).map(|_| input.read_i64()).collect::<Result<_>>()?)
            }
            ATTR_FLOAT_ARRAY => {
                let n = input.read_len(8)?;
                AttrValue::FloatArray((0..n).map(|_| input.read_f64()).collect::<Result<_>>()?)
            }
            other => return Err(Error::invalid(format!("unknown attribute tag {}", other))),
        };
        attrs.set(key, value);
    }
    Ok(attrs)
}

fn read_array(input: &mut IStream<'_>) -> Result<NdArray> {
    let code = input.read_u8()?;
    let ty = ElementType::from_u8(code);
    if ty == ElementType::Unknown {
        return Err(Error::invalid(format!("unknown element type {}", code)));
    }
    let rank = input.read_len(8)?;
    let dims = (0..rank)
        .map(|_| input.read_u64().map(|d| d as usize))
        .collect::<Result<Vec<_>>>()?;
    let shape = Shape::from(dims);
    let count = shape
        .checked_num_elements()
        .ok_or_else(|| Error::invalid(format!("element count of shape {} overflows", shape)))?;

    let data = match ty {
        ElementType::String => {
            let values = (0..checked_count(input, count, 4)?)
                .map(|_| input.read_str())
                .collect::<Result<_>>()?;
            ArrayData::String(values)
        }
        ElementType::PointList => {
            let mut cells = Vec::with_capacity(checked_count(input, count, 4)?);
            for _ in 0..count {
                let n = input.read_len(12)?;
                let cell = (0..n)
                    .map(|_| -> Result<VoxelPoint> {
                        Ok(VoxelPoint::new(input.read_f32()?, input.read_f32()?, input.read_f32()?))
                    })
                    .collect::<Result<_>>()?;
                cells.push(cell);
            }
            ArrayData::PointList(cells)
        }
        ElementType::LabeledPointList => {
            let mut cells = Vec::with_capacity(checked_count(input, count, 4)?);
            for _ in 0..count {
                let n = input.read_len(13)?;
                let cell = (0..n)
                    .map(|_| -> Result<LabeledVoxelPoint> {
                        Ok(LabeledVoxelPoint::new(
                            input.read_f32()?,
                            input.read_f32()?,
                            input.read_f32()?,
                            input.read_u8()?,
                        ))
                    })
                    .collect::<Result<_>>()?;
                cells.push(cell);
            }
            ArrayData::LabeledPointList(cells)
        }
        _ => {
            let len = input.read_u64()?;
            let bytes = input.read_bytes(len as usize)?;
            ArrayData::from_le_bytes(ty, &bytes)?
        }
    };
    NdArray::new(shape, data).map_err(|e| Error::invalid(e.to_string()))
}

fn checked_count(input: &IStream<'_>, count: usize, min_item_size: usize) -> Result<usize> {
    if count.saturating_mul(min_item_size) > input.remaining() {
        return Err(Error::invalid(format!("{} elements overrun the image", count)));
    }
    Ok(count)
}
