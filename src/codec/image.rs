//! Image records: mono, color, color+alpha, depth and disparity.

use super::{base_attrs, Encode, Stamp};
use crate::core::Group;
use crate::schema::keys::{ATTR_BASELINE, ATTR_FRAME_ID};
use crate::schema::RecordKind;
use crate::util::{NdArray, Result};

/// Pixel layout of an [`Image`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageEncoding {
    /// `(H, W)` uint8
    Mono8,
    /// `(H, W)` uint16
    Mono16,
    /// `(H, W, 3)` uint8
    Bgr8,
    /// `(H, W, 3)` uint8
    Rgb8,
    /// `(H, W, 4)` uint8
    Bgra8,
    /// `(H, W, 4)` uint8
    Rgba8,
    /// `(H, W)` float32, metres
    Depth,
}

impl ImageEncoding {
    pub const fn kind(self) -> RecordKind {
        match self {
            Self::Mono8 => RecordKind::Mono8,
            Self::Mono16 => RecordKind::Mono16,
            Self::Bgr8 => RecordKind::Bgr8,
            Self::Rgb8 => RecordKind::Rgb8,
            Self::Bgra8 => RecordKind::Bgra8,
            Self::Rgba8 => RecordKind::Rgba8,
            Self::Depth => RecordKind::Depth,
        }
    }
}

/// A camera image anchored in a coordinate frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    encoding: ImageEncoding,
    data: NdArray,
    frame_id: String,
    stamp: Stamp,
}

impl Image {
    pub fn new(encoding: ImageEncoding, data: NdArray, frame_id: impl Into<String>) -> Self {
        Self {
            encoding,
            data,
            frame_id: frame_id.into(),
            stamp: Stamp::UNTIMED,
        }
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    pub fn data(&self) -> &NdArray {
        &self.data
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }
}

impl Encode for Image {
    fn kind(&self) -> RecordKind {
        self.encoding.kind()
    }

    fn validate(&self) -> Result<()> {
        self.kind().check(&self.data)
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = base_attrs(self.kind(), self.stamp).with(ATTR_FRAME_ID, self.frame_id.as_str());
        group.create_dataset(tag, self.data.clone(), attrs)?;
        Ok(())
    }
}

/// Stereo disparity map, `(H, W)` float32, with the rig baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct DisparityImage {
    data: NdArray,
    frame_id: String,
    baseline: f64,
    stamp: Stamp,
}

impl DisparityImage {
    /// `baseline` is the stereo baseline in metres.
    pub fn new(data: NdArray, frame_id: impl Into<String>, baseline: f64) -> Self {
        Self {
            data,
            frame_id: frame_id.into(),
            baseline,
            stamp: Stamp::UNTIMED,
        }
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }
}

impl Encode for DisparityImage {
    fn kind(&self) -> RecordKind {
        RecordKind::Disparity
    }

    fn validate(&self) -> Result<()> {
        RecordKind::Disparity.check(&self.data)
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = base_attrs(RecordKind::Disparity, self.stamp)
            .with(ATTR_FRAME_ID, self.frame_id.as_str())
            .with(ATTR_BASELINE, self.baseline);
        group.create_dataset(tag, self.data.clone(), attrs)?;
        Ok(())
    }
}
