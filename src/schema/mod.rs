//! Type registry: record kinds, their storage contracts and the
//! reserved names of the container layout.

pub mod keys;
mod kind;

pub use kind::{LeafContract, RecordKind};
