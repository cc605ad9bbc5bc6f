use super::{base_attrs, Encode, Stamp};
use crate::core::{Attributes, Group};
use crate::schema::keys::{ATTR_FRAME_ID, SUB_CX, SUB_CY, SUB_FX, SUB_FY, SUB_HEIGHT, SUB_WIDTH};
use crate::schema::RecordKind;
use crate::util::{NdArray, Result};

/// Pinhole camera intrinsics.
///
/// Focal lengths and principal point are in pixels. Children are bare
/// scalar datasets without attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Intrinsic {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    pub height: u32,
    pub width: u32,
    frame_id: String,
    stamp: Stamp,
}

impl Intrinsic {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fx: f64,
        fy: f64,
        cx: f64,
        cy: f64,
        height: u32,
        width: u32,
        frame_id: impl Into<String>,
    ) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            height,
            width,
            frame_id: frame_id.into(),
            stamp: Stamp::UNTIMED,
        }
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }
}

impl Encode for Intrinsic {
    fn kind(&self) -> RecordKind {
        RecordKind::Intrinsic
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = base_attrs(RecordKind::Intrinsic, self.stamp).with(ATTR_FRAME_ID, self.frame_id.as_str());
        let mut sub = group.create_group(tag, attrs)?;
        for (name, v) in [(SUB_FX, self.fx), (SUB_FY, self.fy), (SUB_CX, self.cx), (SUB_CY, self.cy)] {
            sub.create_dataset(name, NdArray::scalar(v), Attributes::new())?;
        }
        sub.create_dataset(SUB_HEIGHT, NdArray::scalar(self.height), Attributes::new())?;
        sub.create_dataset(SUB_WIDTH, NdArray::scalar(self.width), Attributes::new())?;
        Ok(())
    }
}
