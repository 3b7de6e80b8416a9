//! Byte sinks and sources.
//!
//! The codec writes and reads one byte at a time through [`WireSink`] and
//! [`WireSource`], so it can sit on top of whatever buffer the host record
//! serializer already uses. [`WireWriter`] and [`WireReader`] are the
//! in-memory implementations, with a few fixed-width helpers for hosts that
//! have nothing better.

use crate::error::{CodecError, CodecResult};

/// Destination for encoded bytes.
pub trait WireSink {
    /// Append one byte.
    fn put_u8(&mut self, byte: u8);

    /// Append a run of bytes.
    fn put_slice(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.put_u8(*byte);
        }
    }
}

/// Source of bytes to decode.
pub trait WireSource {
    /// Take the next byte, or `None` at end of input.
    fn take_u8(&mut self) -> Option<u8>;
}

impl WireSink for Vec<u8> {
    fn put_u8(&mut self, byte: u8) {
        self.push(byte);
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<S: WireSink + ?Sized> WireSink for &mut S {
    fn put_u8(&mut self, byte: u8) {
        (**self).put_u8(byte);
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        (**self).put_slice(bytes);
    }
}

impl WireSource for &[u8] {
    fn take_u8(&mut self) -> Option<u8> {
        let (first, rest) = self.split_first()?;
        *self = rest;
        Some(*first)
    }
}

impl<S: WireSource + ?Sized> WireSource for &mut S {
    fn take_u8(&mut self) -> Option<u8> {
        (**self).take_u8()
    }
}

/// Growable in-memory byte writer.
#[derive(Debug, Clone, Default)]
pub struct WireWriter {
    buffer: Vec<u8>,
}

impl WireWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Write one byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Write a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a little-endian `u64`.
    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a `u32` length prefix followed by the bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthOverflow`] if the slice is longer than
    /// `u32::MAX`.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> CodecResult<()> {
        let len =
            u32::try_from(bytes.len()).map_err(|_| CodecError::LengthOverflow { len: bytes.len() })?;
        self.write_u32(len);
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Write a length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// Same as [`write_bytes`](Self::write_bytes).
    pub fn write_str(&mut self, value: &str) -> CodecResult<()> {
        self.write_bytes(value.as_bytes())
    }
}

impl WireSink for WireWriter {
    fn put_u8(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }
}

/// Cursor over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> WireReader<'a> {
    /// Start reading at the beginning of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Whether every byte has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless every byte has been consumed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TrailingBytes`] if input is left over.
    pub fn ensure_fully_consumed(&self) -> CodecResult<()> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(CodecError::TrailingBytes { count }),
        }
    }

    /// Read one byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] at end of input.
    pub fn read_u8(&mut self) -> CodecResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Read a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> CodecResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Read a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than 8 bytes remain.
    pub fn read_u64(&mut self) -> CodecResult<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Read a `u32` length prefix and that many bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if the buffer is shorter than the
    /// prefix claims.
    pub fn read_bytes(&mut self) -> CodecResult<&'a [u8]> {
        let len = usize::try_from(self.read_u32()?)
            .map_err(|_| CodecError::LengthOverflow { len: usize::MAX })?;
        self.take(len)
    }

    fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let slice = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn take(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        let remaining = self.remaining();
        let end = self
            .offset
            .checked_add(len)
            .filter(|_| len <= remaining)
            .ok_or(CodecError::Truncated {
                needed: len,
                remaining,
            })?;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or(CodecError::Truncated {
                needed: len,
                remaining,
            })?;
        self.offset = end;
        Ok(slice)
    }
}

impl WireSource for WireReader<'_> {
    fn take_u8(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.offset)?;
        self.offset = self.offset.saturating_add(1);
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_and_reader_fixed_width() {
        let mut writer = WireWriter::new();
        writer.write_u8(7);
        writer.write_u64(0x0102_0304_0506_0708);
        writer.write_str("host").unwrap();

        let bytes = writer.into_bytes();
        let mut reader = WireReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_u64().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(reader.read_bytes().unwrap(), b"host");
        assert!(reader.ensure_fully_consumed().is_ok());
    }

    #[test]
    fn test_reader_truncation() {
        let bytes = [1u8, 2, 3];
        let mut reader = WireReader::new(&bytes);
        assert_eq!(
            reader.read_u32(),
            Err(CodecError::Truncated {
                needed: 4,
                remaining: 3
            })
        );
        // A failed read consumes nothing.
        assert_eq!(reader.offset(), 0);
        assert_eq!(reader.ensure_fully_consumed(), Err(CodecError::TrailingBytes { count: 3 }));
    }

    #[test]
    fn test_length_prefix_beyond_buffer() {
        let mut writer = WireWriter::new();
        writer.write_u32(100);
        writer.write_u8(1);
        let bytes = writer.into_bytes();

        let mut reader = WireReader::new(&bytes);
        assert!(matches!(
            reader.read_bytes(),
            Err(CodecError::Truncated { needed: 100, .. })
        ));
    }

    #[test]
    fn test_slice_source_advances() {
        let bytes = [9u8, 8];
        let mut source: &[u8] = &bytes;
        assert_eq!(source.take_u8(), Some(9));
        assert_eq!(source.take_u8(), Some(8));
        assert_eq!(source.take_u8(), None);
    }

    #[test]
    fn test_reader_source_tracks_offset() {
        let bytes = [1u8, 2];
        let mut reader = WireReader::new(&bytes);
        assert_eq!(reader.take_u8(), Some(1));
        assert_eq!(reader.offset(), 1);
        assert_eq!(reader.take_u8(), Some(2));
        assert!(reader.is_exhausted());
        assert_eq!(reader.take_u8(), None);
    }

    #[test]
    fn test_vec_sink() {
        let mut out = Vec::new();
        out.put_u8(1);
        out.put_slice(&[2, 3]);
        assert_eq!(out, [1, 2, 3]);
    }
}
