//! The closed set of record kinds and their storage contracts.

use std::fmt;

use crate::util::{ElementType, Error, NdArray, Result};

/// Kind tag of a record. Stored verbatim in the `type` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Uint8,
    Int8,
    Int16,
    Int32,
    Int64,
    Float16,
    Float32,
    Float64,
    Mono8,
    Mono16,
    Bgr8,
    Rgb8,
    Bgra8,
    Rgba8,
    Depth,
    Disparity,
    Points,
    VoxelPoints,
    Semantic1d,
    Semantic2d,
    Semantic3d,
    VoxelSemantic3d,
    Pose,
    Translation,
    Quaternion,
    Intrinsic,
    Color,
}

impl RecordKind {
    /// Every kind, in registry order.
    pub const ALL: [RecordKind; 27] = [
        Self::Uint8,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Float16,
        Self::Float32,
        Self::Float64,
        Self::Mono8,
        Self::Mono16,
        Self::Bgr8,
        Self::Rgb8,
        Self::Bgra8,
        Self::Rgba8,
        Self::Depth,
        Self::Disparity,
        Self::Points,
        Self::VoxelPoints,
        Self::Semantic1d,
        Self::Semantic2d,
        Self::Semantic3d,
        Self::VoxelSemantic3d,
        Self::Pose,
        Self::Translation,
        Self::Quaternion,
        Self::Intrinsic,
        Self::Color,
    ];

    /// Tag string written to the `type` attribute.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Mono8 => "mono8",
            Self::Mono16 => "mono16",
            Self::Bgr8 => "bgr8",
            Self::Rgb8 => "rgb8",
            Self::Bgra8 => "bgra8",
            Self::Rgba8 => "rgba8",
            Self::Depth => "depth",
            Self::Disparity => "disparity",
            Self::Points => "points",
            Self::VoxelPoints => "voxel-points",
            Self::Semantic1d => "semantic1d",
            Self::Semantic2d => "semantic2d",
            Self::Semantic3d => "semantic3d",
            Self::VoxelSemantic3d => "voxel-semantic3d",
            Self::Pose => "pose",
            Self::Translation => "translation",
            Self::Quaternion => "quaternion",
            Self::Intrinsic => "intrinsic",
            Self::Color => "color",
        }
    }

    /// Parse a kind from its tag string.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Required storage element type, or None for composite kinds.
    ///
    /// Translation and quaternion also accept float64; this is their
    /// default type.
    pub const fn storage(self) -> Option<ElementType> {
        match self {
            Self::Uint8 => Some(ElementType::Uint8),
            Self::Int8 => Some(ElementType::Int8),
            Self::Int16 => Some(ElementType::Int16),
            Self::Int32 => Some(ElementType::Int32),
            Self::Int64 => Some(ElementType::Int64),
            Self::Float16 => Some(ElementType::Float16),
            Self::Float32 => Some(ElementType::Float32),
            Self::Float64 => Some(ElementType::Float64),
            Self::Mono8 => Some(ElementType::Uint8),
            Self::Mono16 => Some(ElementType::Uint16),
            Self::Bgr8 | Self::Rgb8 | Self::Bgra8 | Self::Rgba8 => Some(ElementType::Uint8),
            Self::Depth | Self::Disparity | Self::Points => Some(ElementType::Float32),
            Self::VoxelPoints => Some(ElementType::PointList),
            Self::Semantic1d | Self::Semantic2d => Some(ElementType::Uint8),
            Self::VoxelSemantic3d => Some(ElementType::LabeledPointList),
            Self::Translation | Self::Quaternion => Some(ElementType::Float32),
            Self::Color => Some(ElementType::Uint8),
            Self::Semantic3d | Self::Pose | Self::Intrinsic => None,
        }
    }

    /// True for kinds written as a sub-group of nested records.
    pub const fn is_composite(self) -> bool {
        self.storage().is_none()
    }

    /// Shape/dtype contract of a leaf kind, or None for composites.
    pub fn contract(self) -> Option<LeafContract> {
        use ElementType as E;
        const U8: &[ElementType] = &[E::Uint8];
        const F32: &[ElementType] = &[E::Float32];
        const FLOATS: &[ElementType] = &[E::Float32, E::Float64];

        let c = match self {
            Self::Uint8
            | Self::Int8
            | Self::Int16
            | Self::Int32
            | Self::Int64
            | Self::Float16
            | Self::Float32
            | Self::Float64 => {
                let dtypes: &'static [ElementType] = match self {
                    Self::Uint8 => U8,
                    Self::Int8 => &[E::Int8],
                    Self::Int16 => &[E::Int16],
                    Self::Int32 => &[E::Int32],
                    Self::Int64 => &[E::Int64],
                    Self::Float16 => &[E::Float16],
                    Self::Float32 => F32,
                    _ => &[E::Float64],
                };
                LeafContract::fixed("()", 0, &[], dtypes)
            }
            Self::Mono8 | Self::Semantic2d => LeafContract::fixed("(H, W)", 2, &[], U8),
            Self::Mono16 => LeafContract::fixed("(H, W)", 2, &[], &[E::Uint16]),
            Self::Bgr8 | Self::Rgb8 => LeafContract::fixed("(H, W, 3)", 3, &[(2, 3)], U8),
            Self::Bgra8 | Self::Rgba8 => LeafContract::fixed("(H, W, 4)", 3, &[(2, 4)], U8),
            Self::Depth | Self::Disparity => LeafContract::fixed("(H, W)", 2, &[], F32),
            Self::Points => LeafContract::fixed("(N, 3)", 2, &[(1, 3)], F32),
            Self::Semantic1d => LeafContract::fixed("(N,)", 1, &[], U8),
            Self::Translation => LeafContract::fixed("[x, y, z]", 1, &[(0, 3)], FLOATS),
            Self::Quaternion => LeafContract::fixed("[x, y, z, w]", 1, &[(0, 4)], FLOATS),
            Self::Color => LeafContract::fixed("[b, g, r]", 1, &[(0, 3)], U8),
            Self::VoxelPoints => LeafContract::any_shape(&[E::PointList]),
            Self::VoxelSemantic3d => LeafContract::any_shape(&[E::LabeledPointList]),
            Self::Semantic3d | Self::Pose | Self::Intrinsic => return None,
        };
        Some(c)
    }

    /// Check an array against this kind's leaf contract.
    pub fn check(self, array: &NdArray) -> Result<()> {
        match self.contract() {
            Some(contract) => contract.check(self, array),
            None => Err(Error::other(format!(
                "{} is a composite kind with no leaf contract",
                self
            ))),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape and element-type rules for one leaf kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeafContract {
    /// Human-readable layout used in error messages, e.g. `(H, W, 3)`.
    pub layout: &'static str,
    /// Required rank; None when the shape is not checked.
    pub rank: Option<usize>,
    /// `(axis, size)` pairs that must match exactly.
    pub fixed_axes: &'static [(usize, usize)],
    /// Accepted element types.
    pub dtypes: &'static [ElementType],
}

impl LeafContract {
    const fn fixed(
        layout: &'static str,
        rank: usize,
        fixed_axes: &'static [(usize, usize)],
        dtypes: &'static [ElementType],
    ) -> Self {
        Self { layout, rank: Some(rank), fixed_axes, dtypes }
    }

    const fn any_shape(dtypes: &'static [ElementType]) -> Self {
        Self { layout: "any", rank: None, fixed_axes: &[], dtypes }
    }

    /// Validate rank and fixed axes first, then the element type.
    pub fn check(&self, kind: RecordKind, array: &NdArray) -> Result<()> {
        if let Some(rank) = self.rank {
            let shape = array.shape();
            let axes_ok = self
                .fixed_axes
                .iter()
                .all(|&(axis, size)| shape.size(axis) == Some(size));
            if shape.rank() != rank || !axes_ok {
                return Err(Error::Shape {
                    kind: kind.name(),
                    expected: self.layout,
                    actual: shape.to_string(),
                });
            }
        }

        let actual = array.element_type();
        if !self.dtypes.contains(&actual) {
            let expected = self
                .dtypes
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(Error::Dtype {
                kind: kind.name(),
                expected,
                actual: actual.name().to_string(),
            });
        }
        Ok(())
    }
}
