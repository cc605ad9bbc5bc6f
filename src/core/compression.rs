//! Zlib compression for stored container images.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::util::{Error, Result};

/// Map a 0-9 level onto a flate2 setting. Level 0 means "store".
pub fn compression_for_level(level: u32) -> Option<Compression> {
    match level {
        0 => None,
        1 => Some(Compression::fast()),
        2..=8 => Some(Compression::new(level)),
        _ => Some(Compression::best()),
    }
}

/// Compress data using zlib.
///
/// Output format: `[uncompressed_size: u64 LE][zlib stream]`.
pub fn compress(data: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), level);
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;

    let mut result = Vec::with_capacity(8 + compressed.len());
    result.extend_from_slice(&(data.len() as u64).to_le_bytes());
    result.extend_from_slice(&compressed);
    Ok(result)
}

/// Decompress data produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 8 {
        return Err(Error::invalid("compressed block shorter than its size prefix"));
    }

    let mut size = [0u8; 8];
    size.copy_from_slice(&data[..8]);
    let uncompressed_size = u64::from_le_bytes(size);

    // Untrusted prefix. zlib expands at most ~1032:1.
    let capacity = usize::try_from(uncompressed_size)
        .unwrap_or(usize::MAX)
        .min(data.len().saturating_mul(1032));
    let mut decoder = ZlibDecoder::new(&data[8..]);
    let mut decompressed = Vec::with_capacity(capacity);
    decoder.read_to_end(&mut decompressed)?;

    if decompressed.len() as u64 != uncompressed_size {
        return Err(Error::invalid(format!(
            "decompressed {} bytes, header says {}",
            decompressed.len(),
            uncompressed_size
        )));
    }
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress() {
        let original = b"depth depth depth depth depth ".repeat(100);

        let compressed = compress(&original, Compression::default()).unwrap();
        assert!(compressed.len() < original.len());

        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_level_mapping() {
        assert!(compression_for_level(0).is_none());
        assert_eq!(compression_for_level(1), Some(Compression::fast()));
        assert_eq!(compression_for_level(42), Some(Compression::best()));
    }

    #[test]
    fn test_decompress_garbage_fails() {
        assert!(decompress(b"abc").is_err());
        let mut bogus = 16u64.to_le_bytes().to_vec();
        bogus.extend_from_slice(b"not zlib at all");
        assert!(decompress(&bogus).is_err());
    }

    #[test]
    fn test_decompress_rejects_huge_size_prefix() {
        let mut block = compress(b"road road road", Compression::fast()).unwrap();
        block[..8].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(decompress(&block), Err(Error::InvalidStructure(_))));

        block[..8].copy_from_slice(&3u64.to_le_bytes());
        assert!(matches!(decompress(&block), Err(Error::InvalidStructure(_))));
    }
}
