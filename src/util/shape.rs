//! Array shapes.
//!
//! A [`Shape`] lists the extent of each axis in row-major order, the
//! way images are addressed as `(H, W)` and point clouds as `(N, 3)`.

use smallvec::SmallVec;

/// Shape of a multi-dimensional array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Size of each axis. Empty means scalar (rank 0).
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    /// Scalar shape (rank 0).
    pub fn scalar() -> Self {
        Self { dims: SmallVec::new() }
    }

    /// 1-D shape.
    pub fn d1(len: usize) -> Self {
        Self { dims: smallvec::smallvec![len] }
    }

    /// 2-D shape, `(rows, cols)`.
    pub fn d2(rows: usize, cols: usize) -> Self {
        Self { dims: smallvec::smallvec![rows, cols] }
    }

    /// 3-D shape.
    pub fn d3(a: usize, b: usize, c: usize) -> Self {
        Self { dims: smallvec::smallvec![a, b, c] }
    }

    /// Create from a slice of sizes.
    pub fn from_slice(sizes: &[usize]) -> Self {
        Self { dims: SmallVec::from_slice(sizes) }
    }

    /// Number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Size of one axis, or None if the axis does not exist.
    pub fn size(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// All axis sizes.
    pub fn sizes(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of elements (product of all axes, 1 for scalars).
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Like [`num_elements`](Self::num_elements), None if the product overflows.
    pub fn checked_num_elements(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }
}

impl From<usize> for Shape {
    fn from(len: usize) -> Self {
        Self::d1(len)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((a, b): (usize, usize)) -> Self {
        Self::d2(a, b)
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((a, b, c): (usize, usize, usize)) -> Self {
        Self::d3(a, b, c)
    }
}

impl From<&[usize]> for Shape {
    fn from(sizes: &[usize]) -> Self {
        Self::from_slice(sizes)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(sizes: [usize; N]) -> Self {
        Self::from_slice(&sizes)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Self { dims: SmallVec::from_vec(v) }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, s) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", s)?;
        }
        if self.dims.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}
