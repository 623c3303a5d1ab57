//! Bounded reads over the raw database buffer.
//!
//! Every read takes an absolute offset; there is no shared cursor, so a
//! `ByteStore` over `Sync` storage can serve concurrent lookups as-is.
//!
//! Out-of-range reads clamp to the buffer end instead of failing. This keeps
//! lookups non-fatal against a truncated trailing record:
//! - `read_at` returns a shortened (possibly empty) window
//! - integer reads zero-fill the missing high bytes
//! - `read_cstring` returns the remaining bytes when no terminator is found

use super::format::{Header, IndexEntry};
use crate::Result;

/// Owns the database bytes and the parsed header.
pub struct ByteStore<S> {
    data: S,
    header: Header,
}

impl<S: AsRef<[u8]>> ByteStore<S> {
    /// Parse and validate the header of `data`.
    pub fn load(data: S) -> Result<Self> {
        let bytes = data.as_ref();
        let header = Header::parse(bytes)?;
        header.validate(bytes.len())?;
        Ok(Self { data, header })
    }

    /// The parsed header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Total buffer length.
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    /// Whether the buffer is empty. Never true for a loaded store.
    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// The whole buffer.
    pub fn bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Window of up to `length` bytes starting at `offset`.
    pub fn read_at(&self, offset: usize, length: usize) -> &[u8] {
        let bytes = self.bytes();
        if offset > bytes.len() {
            return &[];
        }
        let end = offset.saturating_add(length).min(bytes.len());
        &bytes[offset..end]
    }

    /// Single byte at `offset`, or `None` past the end.
    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.bytes().get(offset).copied()
    }

    /// Little-endian 24-bit integer at `offset`.
    pub fn read_u24_le(&self, offset: usize) -> u32 {
        let mut buf = [0u8; 4];
        let window = self.read_at(offset, 3);
        buf[..window.len()].copy_from_slice(window);
        u32::from_le_bytes(buf)
    }

    /// Little-endian 32-bit integer at `offset`.
    pub fn read_u32_le(&self, offset: usize) -> u32 {
        let mut buf = [0u8; 4];
        let window = self.read_at(offset, 4);
        buf[..window.len()].copy_from_slice(window);
        u32::from_le_bytes(buf)
    }

    /// Bytes from `offset` up to (not including) the next NUL.
    pub fn read_cstring(&self, offset: usize) -> &[u8] {
        let tail = self.read_at(offset, usize::MAX);
        match memchr::memchr(0, tail) {
            Some(end) => &tail[..end],
            None => tail,
        }
    }

    /// Decode the index entry at absolute `offset`.
    ///
    /// Offsets inside the index span are always in bounds once the header
    /// has been validated.
    pub fn read_entry(&self, offset: usize) -> IndexEntry {
        IndexEntry {
            start_ip: self.read_u32_le(offset),
            record_offset: self.read_u24_le(offset + 4),
        }
    }
}
