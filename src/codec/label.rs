//! Label dictionary entries.

use tracing::trace;

use super::{Color, Encode};
use crate::core::{Attributes, Group};
use crate::schema::keys::{KEY_NAME, SUB_COLOR};
use crate::util::{Error, NdArray, Result};

/// One class of a label dictionary: display name and display color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelEntry {
    pub index: u32,
    pub name: String,
    pub color: Color,
}

impl LabelEntry {
    pub fn new(index: u32, name: impl Into<String>, color: impl Into<Color>) -> Self {
        Self { index, name: name.into(), color: color.into() }
    }

    /// Write the entry as `<index>/name` and `<index>/color` under a
    /// label dictionary group.
    pub fn write_to(&self, dictionary: &mut Group<'_>) -> Result<()> {
        let key = self.index.to_string();
        if dictionary.contains(&key) {
            return Err(Error::DuplicateKey(key));
        }
        trace!(index = self.index, name = %self.name, "writing label entry");
        let mut entry = dictionary.create_group(&key, Attributes::new())?;
        entry.create_dataset(KEY_NAME, NdArray::string(self.name.as_str()), Attributes::new())?;
        self.color.encode(&mut entry, SUB_COLOR)
    }
}
