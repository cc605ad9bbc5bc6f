//! Record codec - one encoder per record kind.
//!
//! Every record type implements [`Encode`]. Encoding validates the
//! payload completely before touching the store, so a rejected record
//! leaves the destination group unchanged. [`Record`] wraps every
//! record type for callers that dispatch on kind at runtime.
//!
//! ```
//! use sensorbox::codec::{Image, ImageEncoding, Stamp};
//! use sensorbox::{Container, NdArray};
//!
//! let mut container = Container::in_memory();
//! let image = NdArray::from_vec((2, 2), vec![0u8, 64, 128, 255]).unwrap();
//! let mut frame = container.current_frame().unwrap();
//! frame
//!     .write("camera", &Image::new(ImageEncoding::Mono8, image, "cam").with_stamp(Stamp::new(5, 0)))
//!     .unwrap();
//! ```

mod cloud;
mod color;
mod image;
mod intrinsic;
mod label;
mod pose;
mod scalar;
mod voxel;

pub use cloud::{PointCloud, Semantic1d, Semantic2d, Semantic3d};
pub use color::Color;
pub use image::{DisparityImage, Image, ImageEncoding};
pub use intrinsic::Intrinsic;
pub use label::LabelEntry;
pub use pose::{Pose, Quaternion, Translation};
pub use scalar::ScalarRecord;
pub use voxel::{VoxelGeometry, VoxelGrid, VoxelKind};

use std::time::Duration;

use tracing::trace;

use crate::core::{Attributes, Group};
use crate::schema::keys::{ATTR_STAMP_NSEC, ATTR_STAMP_SEC, ATTR_TYPE};
use crate::schema::RecordKind;
use crate::util::{Error, Result};

/// Capture time of a record, split into seconds and nanoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp {
    pub sec: i64,
    pub nsec: u32,
}

impl Stamp {
    /// The zero stamp of records captured without a clock.
    pub const UNTIMED: Self = Self { sec: 0, nsec: 0 };

    pub const fn new(sec: i64, nsec: u32) -> Self {
        Self { sec, nsec }
    }

    pub fn is_untimed(&self) -> bool {
        *self == Self::UNTIMED
    }
}

impl From<Duration> for Stamp {
    fn from(d: Duration) -> Self {
        let sec = i64::try_from(d.as_secs()).unwrap_or(i64::MAX);
        Self::new(sec, d.subsec_nanos())
    }
}

/// A record that can be written into a group.
pub trait Encode {
    /// Kind tag written to the `type` attribute.
    fn kind(&self) -> RecordKind;

    /// Check the payload against the kind's contract.
    fn validate(&self) -> Result<()>;

    /// Write an already validated record. Called by [`encode`](Self::encode).
    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()>;

    /// Validate, then add exactly one leaf or sub-group named `tag`.
    fn encode(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        self.validate()?;
        if group.contains(tag) {
            return Err(Error::DuplicateKey(tag.to_string()));
        }
        trace!(kind = self.kind().name(), tag, "encoding record");
        self.write_validated(group, tag)
    }
}

/// Base attributes shared by every timed record.
pub(crate) fn base_attrs(kind: RecordKind, stamp: Stamp) -> Attributes {
    Attributes::new()
        .with(ATTR_TYPE, kind.name())
        .with(ATTR_STAMP_SEC, stamp.sec)
        .with(ATTR_STAMP_NSEC, stamp.nsec)
}

/// Any record kind, for runtime dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Scalar(ScalarRecord),
    Image(Image),
    Disparity(DisparityImage),
    Points(PointCloud),
    Semantic1d(Semantic1d),
    Semantic2d(Semantic2d),
    Semantic3d(Semantic3d),
    Voxel(VoxelGrid),
    Pose(Pose),
    Translation(Translation),
    Quaternion(Quaternion),
    Intrinsic(Intrinsic),
    Color(Color),
}

macro_rules! dispatch {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            Record::Scalar($r) => $body,
            Record::Image($r) => $body,
            Record::Disparity($r) => $body,
            Record::Points($r) => $body,
            Record::Semantic1d($r) => $body,
            Record::Semantic2d($r) => $body,
            Record::Semantic3d($r) => $body,
            Record::Voxel($r) => $body,
            Record::Pose($r) => $body,
            Record::Translation($r) => $body,
            Record::Quaternion($r) => $body,
            Record::Intrinsic($r) => $body,
            Record::Color($r) => $body,
        }
    };
}

impl Encode for Record {
    fn kind(&self) -> RecordKind {
        dispatch!(self, r => r.kind())
    }

    fn validate(&self) -> Result<()> {
        dispatch!(self, r => r.validate())
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        dispatch!(self, r => r.write_validated(group, tag))
    }
}

macro_rules! impl_from_record {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Record {
                fn from(r: $ty) -> Self {
                    Record::$variant(r)
                }
            }
        )*
    };
}

impl_from_record!(
    Scalar(ScalarRecord),
    Image(Image),
    Disparity(DisparityImage),
    Points(PointCloud),
    Semantic1d(Semantic1d),
    Semantic2d(Semantic2d),
    Semantic3d(Semantic3d),
    Voxel(VoxelGrid),
    Pose(Pose),
    Translation(Translation),
    Quaternion(Quaternion),
    Intrinsic(Intrinsic),
    Color(Color),
);

#[cfg(test)]
mod tests;
