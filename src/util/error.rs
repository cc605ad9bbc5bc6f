//! Error types for sensorbox.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for container and codec operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Destination directory of a container file does not exist
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Unrecognized open mode string
    #[error("Invalid mode \"{0}\": mode must be \"w\" or \"a\"")]
    InvalidMode(String),

    /// Array rank or dimension does not match the kind's contract
    #[error("Shape mismatch for {kind}: expected {expected}, got {actual}")]
    Shape {
        kind: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// Element type does not match the kind's storage type
    #[error("Dtype mismatch for {kind}: expected {expected}, got {actual}")]
    Dtype {
        kind: &'static str,
        expected: String,
        actual: String,
    },

    /// Arrays that must agree in length do not
    #[error("Inconsistent {kind}: {detail}")]
    Consistency { kind: &'static str, detail: String },

    /// Name already taken at the destination group
    #[error("Key already exists: {0}")]
    DuplicateKey(String),

    /// Label dictionary tag is empty
    #[error("Label tag must not be empty")]
    EmptyTag,

    /// Tag collides with a reserved top-level name
    #[error("\"{0}\" is reserved")]
    ReservedName(String),

    /// Frame index outside `0..=max`
    #[error("Frame index {index} out of range (max: {max:?})")]
    OutOfRange { index: i64, max: Option<u64> },

    /// No frame has been written yet
    #[error("Container holds no frames")]
    NoFrames,

    /// Container was finalized and cannot be used any more
    #[error("Container is finalized and cannot be modified")]
    Finalized,

    /// Node lookup failed
    #[error("Node not found: {0}")]
    NotFound(String),

    /// Invalid data structure in a stored image
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// True for the errors raised by record validation.
    ///
    /// These are always raised before the store is touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Shape { .. } | Self::Dtype { .. } | Self::Consistency { .. }
        )
    }
}

/// Result type alias for sensorbox operations.
pub type Result<T> = std::result::Result<T, Error>;
