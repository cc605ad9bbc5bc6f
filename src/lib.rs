//! # sensorbox
//!
//! Hierarchical, self-describing containers for robotics sensor data.
//!
//! A container holds indexed frames (`/data/<n>`), label dictionaries
//! (`/label/<tag>`) and common groups (`/<tag>`). Records are written
//! into those groups through a closed set of typed kinds: images, point
//! clouds, voxel grids, poses, camera intrinsics, semantic labels and
//! scalar values. Every record is validated against its kind's
//! shape/dtype contract before anything is written.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (element types, shapes, arrays, errors)
//! - [`core`] - The `Store` capability trait, group handles, attributes
//! - [`schema`] - Record kinds, storage contracts and reserved names
//! - [`codec`] - One encoder per record kind
//! - [`container`] - Frame/label/common addressing and finalize
//! - [`store`] - In-memory and file-backed stores
//!
//! ## Example
//!
//! ```no_run
//! use sensorbox::codec::{Image, ImageEncoding, LabelEntry, Pose, Stamp};
//! use sensorbox::{Container, NdArray};
//!
//! # fn main() -> sensorbox::Result<()> {
//! let mut container = Container::create("drive.sbox")?;
//!
//! let depth = NdArray::from_vec((2, 2), vec![1.0f32, 1.5, 2.0, 2.5])?;
//! let mut frame = container.next_frame()?;
//! frame.write("depth", &Image::new(ImageEncoding::Depth, depth, "cam").with_stamp(Stamp::new(5, 0)))?;
//! frame.write("odom", &Pose::new([0.0f64, 0.0, 1.0], [0.0f64, 0.0, 0.0, 1.0], "map", "base"))?;
//!
//! LabelEntry::new(1, "road", [128u8, 64, 128]).write_to(&mut container.label_group("cityscapes")?)?;
//! container.finalize()?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod container;
pub mod core;
pub mod schema;
pub mod store;
pub mod util;

// Re-export commonly used types
pub use codec::{Encode, Record, Stamp};
pub use container::{Container, ContainerOptions, Mode};
pub use core::{Group, Store};
pub use schema::RecordKind;
pub use store::{FileStore, MemStore};
pub use util::{Error, NdArray, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::codec::*;
    pub use crate::container::{Container, ContainerOptions, Mode};
    pub use crate::core::{AttrValue, Attributes, Group, Store};
    pub use crate::schema::RecordKind;
    pub use crate::store::{FileStore, MemStore};
    pub use crate::util::{Error, NdArray, Result, Shape};
}
