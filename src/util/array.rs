//! NdArray - a shaped, dynamically typed payload for dataset leaves.
//!
//! Records receive their payload as an [`NdArray`] so the codec can check
//! rank and element type against the kind's contract at runtime, the same
//! way a caller handing over arbitrary sensor buffers would expect.

use byteorder::{ByteOrder, LittleEndian};
use half::f16;

use super::{Element, ElementType, Error, LabeledVoxelPoint, Result, Shape, VoxelPoint};

/// Typed storage of an array's elements, flattened in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayData {
    Uint8(Vec<u8>),
    Int8(Vec<i8>),
    Uint16(Vec<u16>),
    Int16(Vec<i16>),
    Uint32(Vec<u32>),
    Int32(Vec<i32>),
    Uint64(Vec<u64>),
    Int64(Vec<i64>),
    Float16(Vec<f16>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    String(Vec<String>),
    PointList(Vec<Vec<VoxelPoint>>),
    LabeledPointList(Vec<Vec<LabeledVoxelPoint>>),
}

impl ArrayData {
    /// Element type of the stored values.
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Uint8(_) => ElementType::Uint8,
            Self::Int8(_) => ElementType::Int8,
            Self::Uint16(_) => ElementType::Uint16,
            Self::Int16(_) => ElementType::Int16,
            Self::Uint32(_) => ElementType::Uint32,
            Self::Int32(_) => ElementType::Int32,
            Self::Uint64(_) => ElementType::Uint64,
            Self::Int64(_) => ElementType::Int64,
            Self::Float16(_) => ElementType::Float16,
            Self::Float32(_) => ElementType::Float32,
            Self::Float64(_) => ElementType::Float64,
            Self::String(_) => ElementType::String,
            Self::PointList(_) => ElementType::PointList,
            Self::LabeledPointList(_) => ElementType::LabeledPointList,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Uint8(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::Uint16(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Uint32(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Uint64(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float16(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::String(v) => v.len(),
            Self::PointList(v) => v.len(),
            Self::LabeledPointList(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Little-endian bytes of a fixed-size numeric buffer.
    ///
    /// Returns None for strings and point lists, which have no flat layout.
    pub fn to_le_bytes(&self) -> Option<Vec<u8>> {
        let mut out = vec![0u8; self.len() * self.element_type().num_bytes()];
        match self {
            Self::Uint8(v) => out.copy_from_slice(v),
            Self::Int8(v) => out.copy_from_slice(bytemuck::cast_slice(v)),
            Self::Uint16(v) => LittleEndian::write_u16_into(v, &mut out),
            Self::Int16(v) => LittleEndian::write_i16_into(v, &mut out),
            Self::Uint32(v) => LittleEndian::write_u32_into(v, &mut out),
            Self::Int32(v) => LittleEndian::write_i32_into(v, &mut out),
            Self::Uint64(v) => LittleEndian::write_u64_into(v, &mut out),
            Self::Int64(v) => LittleEndian::write_i64_into(v, &mut out),
            Self::Float16(v) => {
                let bits: Vec<u16> = v.iter().map(|x| x.to_bits()).collect();
                LittleEndian::write_u16_into(&bits, &mut out);
            }
            Self::Float32(v) => LittleEndian::write_f32_into(v, &mut out),
            Self::Float64(v) => LittleEndian::write_f64_into(v, &mut out),
            Self::String(_) | Self::PointList(_) | Self::LabeledPointList(_) => return None,
        }
        Some(out)
    }

    /// Rebuild a numeric buffer from little-endian bytes.
    pub fn from_le_bytes(ty: ElementType, bytes: &[u8]) -> Result<Self> {
        let width = ty.num_bytes();
        if width == 0 {
            return Err(Error::invalid(format!("{} has no flat byte layout", ty)));
        }
        if bytes.len() % width != 0 {
            return Err(Error::invalid(format!(
                "{} bytes is not a multiple of {} element size {}",
                bytes.len(),
                ty,
                width
            )));
        }
        let n = bytes.len() / width;

        macro_rules! read_le {
            ($variant:ident, $ty:ty, $read:ident) => {{
                let mut v = vec![<$ty>::default(); n];
                LittleEndian::$read(bytes, &mut v);
                Self::$variant(v)
            }};
        }

        let data = match ty {
            ElementType::Uint8 => Self::Uint8(bytes.to_vec()),
            ElementType::Int8 => Self::Int8(bytemuck::pod_collect_to_vec(bytes)),
            ElementType::Uint16 => read_le!(Uint16, u16, read_u16_into),
            ElementType::Int16 => read_le!(Int16, i16, read_i16_into),
            ElementType::Uint32 => read_le!(Uint32, u32, read_u32_into),
            ElementType::Int32 => read_le!(Int32, i32, read_i32_into),
            ElementType::Uint64 => read_le!(Uint64, u64, read_u64_into),
            ElementType::Int64 => read_le!(Int64, i64, read_i64_into),
            ElementType::Float16 => {
                let mut bits = vec![0u16; n];
                LittleEndian::read_u16_into(bytes, &mut bits);
                Self::Float16(bits.into_iter().map(f16::from_bits).collect())
            }
            ElementType::Float32 => read_le!(Float32, f32, read_f32_into),
            ElementType::Float64 => read_le!(Float64, f64, read_f64_into),
            _ => return Err(Error::invalid(format!("{} has no flat byte layout", ty))),
        };
        Ok(data)
    }
}

/// A shaped array: the payload of one dataset leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct NdArray {
    shape: Shape,
    data: ArrayData,
}

impl NdArray {
    /// Create an array, checking that the element count matches the shape.
    pub fn new(shape: impl Into<Shape>, data: ArrayData) -> Result<Self> {
        let shape = shape.into();
        if shape.checked_num_elements() != Some(data.len()) {
            return Err(Error::Shape {
                kind: "array",
                expected: "element count equal to the product of the shape",
                actual: format!("{} elements for shape {}", data.len(), shape),
            });
        }
        Ok(Self { shape, data })
    }

    /// Create a numeric array from a flat row-major vector.
    pub fn from_vec<T: Element>(shape: impl Into<Shape>, values: Vec<T>) -> Result<Self> {
        Self::new(shape, T::into_data(values))
    }

    /// Create a 1-D numeric array.
    pub fn from_slice<T: Element>(values: &[T]) -> Self {
        Self {
            shape: Shape::d1(values.len()),
            data: T::into_data(values.to_vec()),
        }
    }

    /// Create a 0-d numeric array.
    pub fn scalar<T: Element>(value: T) -> Self {
        Self {
            shape: Shape::scalar(),
            data: T::into_data(vec![value]),
        }
    }

    /// Create a 0-d string array.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            shape: Shape::scalar(),
            data: ArrayData::String(vec![value.into()]),
        }
    }

    /// Create a grid of `(x, y, z)` point lists, one list per cell.
    pub fn point_grid(shape: impl Into<Shape>, cells: Vec<Vec<VoxelPoint>>) -> Result<Self> {
        Self::new(shape, ArrayData::PointList(cells))
    }

    /// Create a grid of `(x, y, z, label)` point lists, one list per cell.
    pub fn labeled_point_grid(
        shape: impl Into<Shape>,
        cells: Vec<Vec<LabeledVoxelPoint>>,
    ) -> Result<Self> {
        Self::new(shape, ArrayData::LabeledPointList(cells))
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    #[inline]
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the flat values if they are of type `T`.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::from_data(&self.data)
    }

    /// The single value of a 0-d numeric array.
    pub fn scalar_value<T: Element>(&self) -> Option<T> {
        if !self.shape.is_scalar() {
            return None;
        }
        self.as_slice::<T>().and_then(|v| v.first().copied())
    }

    /// The value of a 0-d string array.
    pub fn as_str(&self) -> Option<&str> {
        match (&self.data, self.shape.is_scalar()) {
            (ArrayData::String(v), true) => v.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Fixed-size arrays become 1-D arrays.
impl<T: Element, const N: usize> From<[T; N]> for NdArray {
    fn from(values: [T; N]) -> Self {
        Self::from_slice(&values)
    }
}

impl From<glam::Vec3> for NdArray {
    fn from(v: glam::Vec3) -> Self {
        Self::from_slice(&v.to_array())
    }
}

impl From<glam::DVec3> for NdArray {
    fn from(v: glam::DVec3) -> Self {
        Self::from_slice(&v.to_array())
    }
}

/// Quaternions flatten as `[x, y, z, w]`.
impl From<glam::Quat> for NdArray {
    fn from(q: glam::Quat) -> Self {
        Self::from_slice(&q.to_array())
    }
}

impl From<glam::DQuat> for NdArray {
    fn from(q: glam::DQuat) -> Self {
        Self::from_slice(&q.to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_element_count() {
        let ok = NdArray::from_vec((2, 3), vec![0u8; 6]).unwrap();
        assert_eq!(ok.shape().sizes(), &[2, 3]);
        assert_eq!(ok.element_type(), ElementType::Uint8);

        let err = NdArray::from_vec((2, 3), vec![0u8; 5]).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }

    #[test]
    fn test_scalar_and_string() {
        let a = NdArray::scalar(7i16);
        assert!(a.shape().is_scalar());
        assert_eq!(a.scalar_value::<i16>(), Some(7));
        assert_eq!(a.scalar_value::<i32>(), None);

        let s = NdArray::string("road");
        assert_eq!(s.as_str(), Some("road"));
        assert_eq!(s.element_type(), ElementType::String);
    }

    #[test]
    fn test_le_bytes_roundtrip() {
        let a = NdArray::from_slice(&[1.5f32, -2.25, 1e-3]);
        let bytes = a.data().to_le_bytes().unwrap();
        assert_eq!(bytes.len(), 12);
        let back = ArrayData::from_le_bytes(ElementType::Float32, &bytes).unwrap();
        assert_eq!(&back, a.data());

        assert!(ArrayData::from_le_bytes(ElementType::Float32, &bytes[..5]).is_err());
        assert!(ArrayData::String(vec![]).to_le_bytes().is_none());
    }

    #[test]
    fn test_le_byte_order() {
        let a = ArrayData::Uint16(vec![0x0102, 0xA0B0]);
        assert_eq!(a.to_le_bytes(), Some(vec![0x02, 0x01, 0xB0, 0xA0]));

        let i = ArrayData::Int32(vec![-2]);
        assert_eq!(i.to_le_bytes(), Some(vec![0xFE, 0xFF, 0xFF, 0xFF]));

        let h = ArrayData::Float16(vec![f16::ONE]);
        assert_eq!(h.to_le_bytes(), Some(vec![0x00, 0x3C]));
        assert_eq!(ArrayData::from_le_bytes(ElementType::Float16, &[0x00, 0x3C]).unwrap(), h);

        let d = ArrayData::from_le_bytes(ElementType::Float64, &1.0f64.to_bits().to_le_bytes()).unwrap();
        assert_eq!(d, ArrayData::Float64(vec![1.0]));
    }

    #[test]
    fn test_new_rejects_overflowing_shape() {
        let err = NdArray::new([usize::MAX, 2], ArrayData::Uint8(Vec::new())).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }

    #[test]
    fn test_glam_conversions() {
        let t: NdArray = glam::DVec3::new(1.0, 2.0, 3.0).into();
        assert_eq!(t.as_slice::<f64>(), Some(&[1.0, 2.0, 3.0][..]));

        let a: NdArray = [1u8, 2, 3, 4].into();
        assert_eq!(a.shape().sizes(), &[4]);

        let q: NdArray = glam::Quat::IDENTITY.into();
        assert_eq!(q.as_slice::<f32>(), Some(&[0.0, 0.0, 0.0, 1.0][..]));
    }
}
