//! Store implementations.
//!
//! - [`MemStore`]: the whole tree in memory
//! - [`FileStore`]: a `MemStore` persisted to a binary image on close
//! - [`dump`]: JSON rendering of any store

pub mod dump;
mod file;
pub mod format;
mod image;
mod memory;
mod stream;

pub use file::FileStore;
pub use image::{parse_header, read_image, write_image};
pub use memory::MemStore;
