//! Container file image constants.
//!
//! An image is a 16 byte header followed by the serialized node tree:
//!
//! ```text
//! 0..5   magic "SBOX1"
//! 5      flags
//! 6..8   version (u16 LE)
//! 8..16  body size in bytes (u64 LE)
//! 16..   body, zlib-compressed when FLAG_COMPRESSED is set
//! ```

/// Magic bytes at the start of a container file.
pub const MAGIC: &[u8; 5] = b"SBOX1";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Offset of the flags byte in the header.
pub const FLAGS_OFFSET: usize = 5;

/// Offset of the body size in the header.
pub const BODY_SIZE_OFFSET: usize = 8;

/// Current image format version.
pub const CURRENT_VERSION: u16 = 1;

/// Body is a [`compress`](crate::core::compress) block.
pub const FLAG_COMPRESSED: u8 = 0x01;

/// Node tags in the body.
pub const NODE_GROUP: u8 = 0;
pub const NODE_DATASET: u8 = 1;

/// Attribute value tags in the body.
pub const ATTR_INT: u8 = 0;
pub const ATTR_FLOAT: u8 = 1;
pub const ATTR_STR: u8 = 2;
pub const ATTR_INT_ARRAY: u8 = 3;
pub const ATTR_FLOAT_ARRAY: u8 = 4;

/// Parsed file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageHeader {
    pub flags: u8,
    pub version: u16,
    pub body_size: u64,
}

impl ImageHeader {
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(MAGIC.len(), FLAGS_OFFSET);
        assert_eq!(BODY_SIZE_OFFSET + 8, HEADER_SIZE);
    }

    #[test]
    fn test_flags() {
        let h = ImageHeader { flags: FLAG_COMPRESSED, version: CURRENT_VERSION, body_size: 0 };
        assert!(h.is_compressed());
        assert!(!ImageHeader { flags: 0, ..h }.is_compressed());
    }
}
