//! Element types - the storage type of every value in a dataset leaf.

use bytemuck::Pod;
use half::f16;
use std::fmt;

use super::ArrayData;

/// Storage element type of a dataset.
///
/// Numeric variants have a fixed size and little-endian binary
/// representation. The two point-list variants describe voxel cells:
/// each element is a variable-length list of compound points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ElementType {
    /// Unsigned 8-bit integer
    Uint8 = 1,
    /// Signed 8-bit integer
    Int8 = 2,
    /// Unsigned 16-bit integer
    Uint16 = 3,
    /// Signed 16-bit integer
    Int16 = 4,
    /// Unsigned 32-bit integer
    Uint32 = 5,
    /// Signed 32-bit integer
    Int32 = 6,
    /// Unsigned 64-bit integer
    Uint64 = 7,
    /// Signed 64-bit integer
    Int64 = 8,
    /// 16-bit floating point (IEEE 754 half precision)
    Float16 = 9,
    /// 32-bit floating point
    Float32 = 10,
    /// 64-bit floating point
    Float64 = 11,
    /// UTF-8 string
    String = 12,
    /// Variable-length list of `(x, y, z)` points
    PointList = 13,
    /// Variable-length list of `(x, y, z, label)` points
    LabeledPointList = 14,
    /// Unknown/invalid type
    #[default]
    Unknown = 127,
}

impl ElementType {
    /// Size in bytes of one element; 0 for variable-length types.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Uint8 | Self::Int8 => 1,
            Self::Uint16 | Self::Int16 | Self::Float16 => 2,
            Self::Uint32 | Self::Int32 | Self::Float32 => 4,
            Self::Uint64 | Self::Int64 | Self::Float64 => 8,
            Self::String | Self::PointList | Self::LabeledPointList | Self::Unknown => 0,
        }
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8",
            Self::Int8 => "int8",
            Self::Uint16 => "uint16",
            Self::Int16 => "int16",
            Self::Uint32 => "uint32",
            Self::Int32 => "int32",
            Self::Uint64 => "uint64",
            Self::Int64 => "int64",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::PointList => "vlen{x:f32,y:f32,z:f32}",
            Self::LabeledPointList => "vlen{x:f32,y:f32,z:f32,label:u8}",
            Self::Unknown => "unknown",
        }
    }

    /// Convert from the on-disk code.
    pub const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Uint8,
            2 => Self::Int8,
            3 => Self::Uint16,
            4 => Self::Int16,
            5 => Self::Uint32,
            6 => Self::Int32,
            7 => Self::Uint64,
            8 => Self::Int64,
            9 => Self::Float16,
            10 => Self::Float32,
            11 => Self::Float64,
            12 => Self::String,
            13 => Self::PointList,
            14 => Self::LabeledPointList,
            _ => Self::Unknown,
        }
    }

    /// Returns true if this is a fixed-size numeric type.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.num_bytes() > 0
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Trait for primitive types that can be stored in a numeric dataset.
pub trait Element: Pod + Copy + Default + PartialEq + fmt::Debug {
    /// The corresponding element type.
    const ELEMENT_TYPE: ElementType;

    /// Wrap a vector of values into typed array storage.
    fn into_data(values: Vec<Self>) -> ArrayData;

    /// Borrow the values back out of array storage, if the type matches.
    fn from_data(data: &ArrayData) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const ELEMENT_TYPE: ElementType = ElementType::$variant;

            #[inline]
            fn into_data(values: Vec<Self>) -> ArrayData {
                ArrayData::$variant(values)
            }

            #[inline]
            fn from_data(data: &ArrayData) -> Option<&[Self]> {
                match data {
                    ArrayData::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(u8, Uint8);
impl_element!(i8, Int8);
impl_element!(u16, Uint16);
impl_element!(i16, Int16);
impl_element!(u32, Uint32);
impl_element!(i32, Int32);
impl_element!(u64, Uint64);
impl_element!(i64, Int64);
impl_element!(f16, Float16);
impl_element!(f32, Float32);
impl_element!(f64, Float64);

/// One point of a `voxel-points` cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoxelPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl VoxelPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One point of a `voxel-semantic3d` cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabeledVoxelPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub label: u8,
}

impl LabeledVoxelPoint {
    pub const fn new(x: f32, y: f32, z: f32, label: u8) -> Self {
        Self { x, y, z, label }
    }
}
