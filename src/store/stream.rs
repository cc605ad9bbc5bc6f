//! Little-endian byte streams for container images.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::util::{Error, Result};

/// Output stream tracking its write position.
pub struct OStream<W: Write> {
    writer: W,
    pos: u64,
}

impl<W: Write> OStream<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pos: 0 }
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        self.pos += 1;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.writer.write_u16::<LittleEndian>(value)?;
        self.pos += 2;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        self.pos += 8;
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.writer.write_i64::<LittleEndian>(value)?;
        self.pos += 8;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.writer.write_f32::<LittleEndian>(value)?;
        self.pos += 4;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.writer.write_f64::<LittleEndian>(value)?;
        self.pos += 8;
        Ok(())
    }

    /// Write a length-prefixed (u32) UTF-8 string.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_len(s.len())?;
        self.write_bytes(s.as_bytes())
    }

    /// Write a u32 element count.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| Error::other(format!("length {} exceeds u32", len)))?;
        self.write_u32(len)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Input stream over an in-memory image.
///
/// Running past the end is reported as a corrupt image, not an I/O error.
pub struct IStream<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> IStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(data) }
    }

    #[inline]
    pub fn pos(&self) -> u64 {
        self.cursor.position()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(|e| truncated(e, self.pos()))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.cursor.read_u16::<LittleEndian>().map_err(|e| truncated(e, self.pos()))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.cursor.read_u32::<LittleEndian>().map_err(|e| truncated(e, self.pos()))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.cursor.read_u64::<LittleEndian>().map_err(|e| truncated(e, self.pos()))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.cursor.read_i64::<LittleEndian>().map_err(|e| truncated(e, self.pos()))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.cursor.read_f32::<LittleEndian>().map_err(|e| truncated(e, self.pos()))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.cursor.read_f64::<LittleEndian>().map_err(|e| truncated(e, self.pos()))
    }

    /// Read a u32 element count, rejecting counts the rest of the image
    /// cannot possibly hold.
    pub fn read_len(&mut self, min_item_size: usize) -> Result<usize> {
        let len = self.read_u32()? as usize;
        if len.saturating_mul(min_item_size) > self.remaining() {
            return Err(Error::invalid(format!(
                "count {} at offset {} overruns the image",
                len,
                self.pos()
            )));
        }
        Ok(len)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        if len > self.remaining() {
            return Err(Error::invalid(format!(
                "{} bytes at offset {} overrun the image",
                len,
                self.pos()
            )));
        }
        let mut buf = vec![0u8; len];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_str(&mut self) -> Result<String> {
        let len = self.read_len(1)?;
        Ok(String::from_utf8(self.read_bytes(len)?)?)
    }
}

fn truncated(e: std::io::Error, pos: u64) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::invalid(format!("image truncated at offset {}", pos))
    } else {
        Error::Io(e)
    }
}
