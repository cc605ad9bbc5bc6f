//! Core layer - the storage capability trait and attribute types.
//!
//! This module provides:
//! - [`Store`] - the narrow interface every storage engine implements
//! - [`Group`] - a mutable handle to one group of a store
//! - [`Attributes`] / [`AttrValue`] - node metadata
//! - zlib helpers used by the file store

mod attributes;
mod compression;
mod traits;

pub use attributes::{AttrValue, Attributes};
pub use compression::{compress, compression_for_level, decompress};
pub use traits::{Group, NodeId, NodeKind, Store};
