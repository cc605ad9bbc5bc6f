//! Voxel grid records.
//!
//! A grid is a `(Z, Y, X)` array of cells, each cell holding a
//! variable-length list of points. Geometry vectors are z,y,x ordered.

use super::{base_attrs, Encode, Stamp};
use crate::core::Group;
use crate::schema::keys::{
    ATTR_FRAME_ID, ATTR_LABEL_TAG, ATTR_MAP_ID, ATTR_VOXEL_CENTER, ATTR_VOXEL_MAX, ATTR_VOXEL_MIN,
    ATTR_VOXEL_ORIGIN, ATTR_VOXEL_SIZE,
};
use crate::schema::RecordKind;
use crate::util::{NdArray, Result};

/// Point flavor of a voxel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoxelKind {
    /// Cells of `(x, y, z)` float32 points.
    Points,
    /// Cells of `(x, y, z, label)` points.
    Semantic3d,
}

impl VoxelKind {
    pub const fn kind(self) -> RecordKind {
        match self {
            Self::Points => RecordKind::VoxelPoints,
            Self::Semantic3d => RecordKind::VoxelSemantic3d,
        }
    }
}

/// Placement of a voxel grid in its frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoxelGeometry {
    /// Edge length of one voxel, metres.
    pub size: f64,
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub center: [f64; 3],
    /// Index of the center voxel.
    pub origin: [i64; 3],
}

/// A voxel grid map.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    voxel_kind: VoxelKind,
    cells: NdArray,
    frame_id: String,
    geometry: VoxelGeometry,
    label_tag: Option<String>,
    map_id: Option<String>,
    stamp: Stamp,
}

impl VoxelGrid {
    pub fn new(
        voxel_kind: VoxelKind,
        cells: NdArray,
        frame_id: impl Into<String>,
        geometry: VoxelGeometry,
    ) -> Self {
        Self {
            voxel_kind,
            cells,
            frame_id: frame_id.into(),
            geometry,
            label_tag: None,
            map_id: None,
            stamp: Stamp::UNTIMED,
        }
    }

    pub fn with_label_tag(mut self, label_tag: impl Into<String>) -> Self {
        self.label_tag = Some(label_tag.into());
        self
    }

    pub fn with_map_id(mut self, map_id: impl Into<String>) -> Self {
        self.map_id = Some(map_id.into());
        self
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn geometry(&self) -> &VoxelGeometry {
        &self.geometry
    }
}

impl Encode for VoxelGrid {
    fn kind(&self) -> RecordKind {
        self.voxel_kind.kind()
    }

    fn validate(&self) -> Result<()> {
        self.kind().check(&self.cells)
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let g = &self.geometry;
        let mut attrs = base_attrs(self.kind(), self.stamp).with(ATTR_FRAME_ID, self.frame_id.as_str());
        attrs.set_opt(ATTR_LABEL_TAG, self.label_tag.as_deref());
        attrs.set_opt(ATTR_MAP_ID, self.map_id.as_deref());
        attrs.set(ATTR_VOXEL_SIZE, g.size);
        attrs.set(ATTR_VOXEL_MIN, g.min);
        attrs.set(ATTR_VOXEL_MAX, g.max);
        attrs.set(ATTR_VOXEL_CENTER, g.center);
        attrs.set(ATTR_VOXEL_ORIGIN, g.origin);
        group.create_dataset(tag, self.cells.clone(), attrs)?;
        Ok(())
    }
}
