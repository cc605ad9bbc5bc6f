//! Scalar numeric records (`uint8` through `float64`).

use half::f16;

use super::{base_attrs, Encode, Stamp};
use crate::core::Group;
use crate::schema::RecordKind;
use crate::util::{Error, NdArray, Result};

/// A single 0-d numeric value.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarRecord {
    kind: RecordKind,
    value: NdArray,
    stamp: Stamp,
}

impl ScalarRecord {
    /// Wrap an arbitrary array as a scalar of `kind`.
    ///
    /// The array must be 0-d with exactly the kind's element type;
    /// this is checked at encode time.
    pub fn new(kind: RecordKind, value: NdArray) -> Self {
        Self { kind, value, stamp: Stamp::UNTIMED }
    }

    pub fn uint8(v: u8) -> Self {
        Self::new(RecordKind::Uint8, NdArray::scalar(v))
    }

    pub fn int8(v: i8) -> Self {
        Self::new(RecordKind::Int8, NdArray::scalar(v))
    }

    pub fn int16(v: i16) -> Self {
        Self::new(RecordKind::Int16, NdArray::scalar(v))
    }

    pub fn int32(v: i32) -> Self {
        Self::new(RecordKind::Int32, NdArray::scalar(v))
    }

    pub fn int64(v: i64) -> Self {
        Self::new(RecordKind::Int64, NdArray::scalar(v))
    }

    pub fn float16(v: f16) -> Self {
        Self::new(RecordKind::Float16, NdArray::scalar(v))
    }

    pub fn float32(v: f32) -> Self {
        Self::new(RecordKind::Float32, NdArray::scalar(v))
    }

    pub fn float64(v: f64) -> Self {
        Self::new(RecordKind::Float64, NdArray::scalar(v))
    }

    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn value(&self) -> &NdArray {
        &self.value
    }

    pub fn stamp(&self) -> Stamp {
        self.stamp
    }
}

fn is_scalar_kind(kind: RecordKind) -> bool {
    matches!(
        kind,
        RecordKind::Uint8
            | RecordKind::Int8
            | RecordKind::Int16
            | RecordKind::Int32
            | RecordKind::Int64
            | RecordKind::Float16
            | RecordKind::Float32
            | RecordKind::Float64
    )
}

impl Encode for ScalarRecord {
    fn kind(&self) -> RecordKind {
        self.kind
    }

    fn validate(&self) -> Result<()> {
        if !is_scalar_kind(self.kind) {
            return Err(Error::other(format!("{} is not a scalar kind", self.kind)));
        }
        self.kind.check(&self.value)
    }

    fn write_validated(&self, group: &mut Group<'_>, tag: &str) -> Result<()> {
        let attrs = base_attrs(self.kind, self.stamp);
        group.create_dataset(tag, self.value.clone(), attrs)?;
        Ok(())
    }
}
