//! On-disk format constants and structures.

use crate::{Error, Result};

/// Header size in bytes: two little-endian u32 index offsets.
pub const HEADER_SIZE: usize = 8;

/// Index entry size in bytes: start IP (u32) + record offset (u24).
pub const INDEX_LEN: usize = 7;

/// Width of a redirect offset in bytes.
pub const OFFSET_LEN: usize = 3;

/// Mode byte that precedes a record field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    /// Field is stored inline as a NUL-terminated string
    Direct = 0x00,
    /// Country and area both live behind one redirect
    RedirectSingle = 0x01,
    /// Only the country lives behind the redirect; area follows the record
    RedirectDouble = 0x02,
}

impl RecordMode {
    /// Classify a mode byte. Anything other than the two redirect flags
    /// is the first byte of an inline string.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => Self::RedirectSingle,
            0x02 => Self::RedirectDouble,
            _ => Self::Direct,
        }
    }

    /// Whether the field is a redirect of either kind.
    pub fn is_redirect(self) -> bool {
        !matches!(self, Self::Direct)
    }
}

/// File header: absolute offsets of the first and last index entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Offset of the first index entry
    pub index_start: u32,
    /// Offset of the last index entry (inclusive)
    pub index_end: u32,
}

impl Header {
    /// Parse the header from the first eight bytes of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::InvalidHeaderSize {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        Ok(Self {
            index_start: u32::from_le_bytes([data[0], data[1], data[2], data[3]]),
            index_end: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
        })
    }

    /// Validate the index bounds against a buffer of `len` bytes.
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.index_end < self.index_start {
            return Err(Error::CorruptDatabase(format!(
                "index end {:#x} precedes index start {:#x}",
                self.index_end, self.index_start
            )));
        }
        if (self.index_start as usize) < HEADER_SIZE {
            return Err(Error::CorruptDatabase(format!(
                "index start {:#x} overlaps the header",
                self.index_start
            )));
        }
        if (self.index_end - self.index_start) as usize % INDEX_LEN != 0 {
            return Err(Error::CorruptDatabase(format!(
                "index span {} is not a multiple of {}",
                self.index_end - self.index_start,
                INDEX_LEN
            )));
        }
        if self.index_end as usize + INDEX_LEN > len {
            return Err(Error::CorruptDatabase(format!(
                "index ends at {:#x} but buffer is {} bytes",
                self.index_end as usize + INDEX_LEN,
                len
            )));
        }
        Ok(())
    }

    /// Number of index entries.
    pub fn total(&self) -> usize {
        (self.index_end - self.index_start) as usize / INDEX_LEN + 1
    }

    /// Byte offset of the `i`-th index entry.
    pub fn entry_offset(&self, i: usize) -> usize {
        self.index_start as usize + i * INDEX_LEN
    }
}

/// One decoded index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// First address of the range
    pub start_ip: u32,
    /// Absolute offset of the range's record
    pub record_offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(start: u32, end: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&start.to_le_bytes());
        data.extend_from_slice(&end.to_le_bytes());
        data
    }

    #[test]
    fn test_header_parse() {
        let header = Header::parse(&header_bytes(0x10, 0x1e)).unwrap();
        assert_eq!(header.index_start, 0x10);
        assert_eq!(header.index_end, 0x1e);
        assert_eq!(header.total(), 3);
        assert_eq!(header.entry_offset(2), 0x1e);
    }

    #[test]
    fn test_header_too_short() {
        let err = Header::parse(&[0u8; 7]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidHeaderSize {
                expected: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn test_header_validation() {
        // Three entries at 0x10, 0x17, 0x1e need 0x25 bytes.
        let header = Header::parse(&header_bytes(0x10, 0x1e)).unwrap();
        assert!(header.validate(0x25).is_ok());
        assert!(header.validate(0x24).is_err());

        let reversed = Header::parse(&header_bytes(0x1e, 0x10)).unwrap();
        assert!(reversed.validate(0x100).is_err());

        let misaligned = Header::parse(&header_bytes(0x10, 0x1f)).unwrap();
        assert!(misaligned.validate(0x100).is_err());

        let overlapping = Header::parse(&header_bytes(0x04, 0x04)).unwrap();
        assert!(overlapping.validate(0x100).is_err());
    }

    #[test]
    fn test_record_mode() {
        assert_eq!(RecordMode::from_u8(0x01), RecordMode::RedirectSingle);
        assert_eq!(RecordMode::from_u8(0x02), RecordMode::RedirectDouble);
        assert_eq!(RecordMode::from_u8(0x00), RecordMode::Direct);
        assert_eq!(RecordMode::from_u8(b'C'), RecordMode::Direct);
        assert!(RecordMode::RedirectSingle.is_redirect());
        assert!(!RecordMode::Direct.is_redirect());
    }
}
