//! Utility types shared by the store, codec and container layers.
//!
//! - [`ElementType`] / [`Element`] - storage element types
//! - [`Shape`] - array shapes
//! - [`NdArray`] / [`ArrayData`] - shaped, typed payloads
//! - [`Error`] / [`Result`] - error handling

mod array;
mod element;
mod error;
mod shape;

pub use array::*;
pub use element::*;
pub use error::*;
pub use shape::*;
