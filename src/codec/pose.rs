//! Rigid transforms: translation, rotation and the pose composite.

use super::{base_attrs, Encode, Stamp};
use crate::core::Group;
use crate::schema::keys::{
    ATTR_ARRAY, ATTR_CHILD_FRAME_ID, ATTR_FRAME_ID, AXES_XYZ, AXES_XYZW, SUB_ROTATION,
    SUB_TRANSLATION,
};
use crate::schema::RecordKind;
use crate::util::{NdArray, Result};

/// `[x, y, z]` translation, float32 or float64.
#[derive(Clone, Debug, PartialEq)]
pub struct Translation {
    data: NdArray,
    stamp: Stamp,
}

impl Translation {
    pub fn new(data: impl Into<NdArray>) -> Self {
        Self { data: data.into(), stamp: Stamp::UNTIMED }
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn data(&self) -> &NdArray {
        &self.data
    }
}

impl Encode for Translation {
    fn kind(&self) -> RecordKind {
        RecordKind::Translation
    }

    fn validate(&self) -> Result<()> {
        RecordKind::Translation.check(&self.data)
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = base_attrs(RecordKind::Translation, self.stamp).with(ATTR_ARRAY, AXES_XYZ);
        group.create_dataset(tag, self.data.clone(), attrs)?;
        Ok(())
    }
}

/// `[x, y, z, w]` rotation quaternion, float32 or float64.
#[derive(Clone, Debug, PartialEq)]
pub struct Quaternion {
    data: NdArray,
    stamp: Stamp,
}

impl Quaternion {
    pub fn new(data: impl Into<NdArray>) -> Self {
        Self { data: data.into(), stamp: Stamp::UNTIMED }
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn data(&self) -> &NdArray {
        &self.data
    }
}

impl Encode for Quaternion {
    fn kind(&self) -> RecordKind {
        RecordKind::Quaternion
    }

    fn validate(&self) -> Result<()> {
        RecordKind::Quaternion.check(&self.data)
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = base_attrs(RecordKind::Quaternion, self.stamp).with(ATTR_ARRAY, AXES_XYZW);
        group.create_dataset(tag, self.data.clone(), attrs)?;
        Ok(())
    }
}

/// Transform from `child_frame_id` into `frame_id`.
///
/// Written as a sub-group holding `translation` and `rotation`; all three
/// nodes carry the same stamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    translation: Translation,
    rotation: Quaternion,
    frame_id: String,
    child_frame_id: String,
    stamp: Stamp,
}

impl Pose {
    pub fn new(
        translation: impl Into<NdArray>,
        rotation: impl Into<NdArray>,
        frame_id: impl Into<String>,
        child_frame_id: impl Into<String>,
    ) -> Self {
        Self {
            translation: Translation::new(translation),
            rotation: Quaternion::new(rotation),
            frame_id: frame_id.into(),
            child_frame_id: child_frame_id.into(),
            stamp: Stamp::UNTIMED,
        }
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.translation = self.translation.with_stamp(stamp);
        self.rotation = self.rotation.with_stamp(stamp);
        self.stamp = stamp;
        self
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    pub fn child_frame_id(&self) -> &str {
        &self.child_frame_id
    }
}

impl Encode for Pose {
    fn kind(&self) -> RecordKind {
        RecordKind::Pose
    }

    fn validate(&self) -> Result<()> {
        self.translation.validate()?;
        self.rotation.validate()
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = base_attrs(RecordKind::Pose, self.stamp)
            .with(ATTR_FRAME_ID, self.frame_id.as_str())
            .with(ATTR_CHILD_FRAME_ID, self.child_frame_id.as_str());
        let mut sub = group.create_group(tag, attrs)?;
        self.translation.write_validated(&mut sub, SUB_TRANSLATION)?;
        self.rotation.write_validated(&mut sub, SUB_ROTATION)
    }
}
