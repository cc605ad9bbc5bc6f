//! Point clouds and semantic label records.

use super::{base_attrs, Encode, Stamp};
use crate::core::{Attributes, Group};
use crate::schema::keys::{ATTR_FRAME_ID, ATTR_LABEL_TAG, ATTR_MAP_ID, SUB_POINTS, SUB_SEMANTIC1D};
use crate::schema::RecordKind;
use crate::util::{Error, NdArray, Result};

/// `(N, 3)` float32 point cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    points: NdArray,
    frame_id: String,
    map_id: Option<String>,
    stamp: Stamp,
}

impl PointCloud {
    pub fn new(points: NdArray, frame_id: impl Into<String>) -> Self {
        Self {
            points,
            frame_id: frame_id.into(),
            map_id: None,
            stamp: Stamp::UNTIMED,
        }
    }

    /// Mark the cloud as (part of) a persistent 3-D map.
    pub fn with_map_id(mut self, map_id: impl Into<String>) -> Self {
        self.map_id = Some(map_id.into());
        self
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn points(&self) -> &NdArray {
        &self.points
    }

    pub fn map_id(&self) -> Option<&str> {
        self.map_id.as_deref()
    }
}

impl Encode for PointCloud {
    fn kind(&self) -> RecordKind {
        RecordKind::Points
    }

    fn validate(&self) -> Result<()> {
        RecordKind::Points.check(&self.points)
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let mut attrs = base_attrs(RecordKind::Points, self.stamp).with(ATTR_FRAME_ID, self.frame_id.as_str());
        attrs.set_opt(ATTR_MAP_ID, self.map_id.as_deref());
        group.create_dataset(tag, self.points.clone(), attrs)?;
        Ok(())
    }
}

/// `(N,)` uint8 labels, values index the label dictionary `label_tag`.
#[derive(Clone, Debug, PartialEq)]
pub struct Semantic1d {
    labels: NdArray,
    label_tag: String,
    stamp: Stamp,
}

impl Semantic1d {
    pub fn new(labels: NdArray, label_tag: impl Into<String>) -> Self {
        Self {
            labels,
            label_tag: label_tag.into(),
            stamp: Stamp::UNTIMED,
        }
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn labels(&self) -> &NdArray {
        &self.labels
    }
}

impl Encode for Semantic1d {
    fn kind(&self) -> RecordKind {
        RecordKind::Semantic1d
    }

    fn validate(&self) -> Result<()> {
        RecordKind::Semantic1d.check(&self.labels)
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = base_attrs(RecordKind::Semantic1d, self.stamp).with(ATTR_LABEL_TAG, self.label_tag.as_str());
        group.create_dataset(tag, self.labels.clone(), attrs)?;
        Ok(())
    }
}

/// `(H, W)` uint8 semantic segmentation map.
#[derive(Clone, Debug, PartialEq)]
pub struct Semantic2d {
    labels: NdArray,
    frame_id: String,
    label_tag: String,
    stamp: Stamp,
}

impl Semantic2d {
    pub fn new(labels: NdArray, frame_id: impl Into<String>, label_tag: impl Into<String>) -> Self {
        Self {
            labels,
            frame_id: frame_id.into(),
            label_tag: label_tag.into(),
            stamp: Stamp::UNTIMED,
        }
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }
}

impl Encode for Semantic2d {
    fn kind(&self) -> RecordKind {
        RecordKind::Semantic2d
    }

    fn validate(&self) -> Result<()> {
        RecordKind::Semantic2d.check(&self.labels)
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = base_attrs(RecordKind::Semantic2d, self.stamp)
            .with(ATTR_FRAME_ID, self.frame_id.as_str())
            .with(ATTR_LABEL_TAG, self.label_tag.as_str());
        group.create_dataset(tag, self.labels.clone(), attrs)?;
        Ok(())
    }
}

/// Labeled point cloud: a `points` cloud and a `semantic1d` label
/// vector of the same length, stored together in one sub-group.
#[derive(Clone, Debug, PartialEq)]
pub struct Semantic3d {
    points: PointCloud,
    labels: Semantic1d,
    frame_id: String,
    label_tag: String,
    map_id: Option<String>,
    stamp: Stamp,
}

impl Semantic3d {
    pub fn new(
        points: NdArray,
        labels: NdArray,
        frame_id: impl Into<String>,
        label_tag: impl Into<String>,
    ) -> Self {
        let frame_id = frame_id.into();
        let label_tag = label_tag.into();
        Self {
            points: PointCloud::new(points, frame_id.clone()),
            labels: Semantic1d::new(labels, label_tag.clone()),
            frame_id,
            label_tag,
            map_id: None,
            stamp: Stamp::UNTIMED,
        }
    }

    pub fn with_map_id(mut self, map_id: impl Into<String>) -> Self {
        let map_id = map_id.into();
        self.points = self.points.with_map_id(map_id.clone());
        self.map_id = Some(map_id);
        self
    }

    /// The stamp is shared with both children.
    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.points = self.points.with_stamp(stamp);
        self.labels = self.labels.with_stamp(stamp);
        self.stamp = stamp;
        self
    }
}

impl Encode for Semantic3d {
    fn kind(&self) -> RecordKind {
        RecordKind::Semantic3d
    }

    fn validate(&self) -> Result<()> {
        let num_points = self.points.points().shape().size(0);
        let num_labels = self.labels.labels().shape().size(0);
        if num_points != num_labels {
            return Err(Error::Consistency {
                kind: RecordKind::Semantic3d.name(),
                detail: format!(
                    "{} points but {} labels",
                    num_points.unwrap_or(0),
                    num_labels.unwrap_or(0)
                ),
            });
        }
        self.points.validate()?;
        self.labels.validate()
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let mut attrs: Attributes = base_attrs(RecordKind::Semantic3d, self.stamp)
            .with(ATTR_FRAME_ID, self.frame_id.as_str())
            .with(ATTR_LABEL_TAG, self.label_tag.as_str());
        attrs.set_opt(ATTR_MAP_ID, self.map_id.as_deref());

        let mut sub = group.create_group(tag, attrs)?;
        self.points.encode(&mut sub, SUB_POINTS)?;
        self.labels.encode(&mut sub, SUB_SEMANTIC1D)
    }
}
