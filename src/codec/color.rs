use super::Encode;
use crate::core::{Attributes, Group};
use crate::schema::keys::{ATTR_ARRAY, ATTR_TYPE, AXES_BGR};
use crate::schema::RecordKind;
use crate::util::{NdArray, Result};

/// An RGB display color. Stored as `[b, g, r]` uint8 without a stamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels in storage order.
    pub const fn to_bgr(self) -> [u8; 3] {
        [self.b, self.g, self.r]
    }
}

impl From<[u8; 3]> for Color {
    /// From `[r, g, b]`.
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl Encode for Color {
    fn kind(&self) -> RecordKind {
        RecordKind::Color
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = Attributes::new()
            .with(ATTR_TYPE, RecordKind::Color.name())
            .with(ATTR_ARRAY, AXES_BGR);
        group.create_dataset(tag, NdArray::from_slice(&self.to_bgr()), attrs)?;
        Ok(())
    }
}
