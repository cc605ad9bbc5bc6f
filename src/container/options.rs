//! Container open options.

use std::fmt;
use std::str::FromStr;

use crate::core::compression_for_level;
use crate::util::{Error, Result};

/// How a container file is opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Create or truncate.
    #[default]
    Write,
    /// Open an existing container (or start a new one) and keep its content.
    Append,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Write => "w",
            Self::Append => "a",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "w" => Ok(Self::Write),
            "a" => Ok(Self::Append),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for opening a file-backed container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerOptions {
    mode: Mode,
    compression_level: u32,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Write,
            compression_level: 0,
        }
    }
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Zlib level for the stored image, 0 (off) to 9. Higher values clamp to 9.
    pub fn with_compression(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }

    pub(crate) fn compression(&self) -> Option<flate2::Compression> {
        compression_for_level(self.compression_level)
    }
}
