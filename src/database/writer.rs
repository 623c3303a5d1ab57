//! Database writer.
//!
//! Produces files in the same layout the reader consumes: header, records,
//! then the index at the end of the file.
//!
//! With redirects enabled, repeated strings are stored once:
//! - a repeated (country, area) pair becomes a `RedirectSingle` record
//! - a repeated country becomes a `RedirectDouble` record
//! - a repeated area becomes a redirected area field

use ahash::AHashMap;

use super::format::{RecordMode, HEADER_SIZE, INDEX_LEN};
use crate::{Error, Result};

/// Largest offset a 24-bit redirect can address.
const MAX_OFFSET: usize = (1 << 24) - 1;

/// One input range for the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRecord {
    pub start: u32,
    pub end: u32,
    pub country: Vec<u8>,
    pub area: Vec<u8>,
}

/// Builds database files from address ranges.
#[derive(Debug, Default)]
pub struct DatabaseWriter {
    records: Vec<RangeRecord>,
    redirects: bool,
}

impl DatabaseWriter {
    /// Create a writer that stores every string inline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store repeated strings once and refer to them with redirects.
    pub fn with_redirects(mut self) -> Self {
        self.redirects = true;
        self
    }

    /// Add the range `[start, end]`. Strings are stored as given, so
    /// callers choose the encoding.
    pub fn add_range(
        &mut self,
        start: u32,
        end: u32,
        country: impl AsRef<[u8]>,
        area: impl AsRef<[u8]>,
    ) -> &mut Self {
        self.records.push(RangeRecord {
            start,
            end,
            country: country.as_ref().to_vec(),
            area: area.as_ref().to_vec(),
        });
        self
    }

    /// Number of ranges added so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no ranges have been added.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize all ranges.
    ///
    /// Ranges must be sorted, contiguous and non-empty: each range starts
    /// right after the previous one ends.
    pub fn write(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut buffer = vec![0u8; HEADER_SIZE];
        let mut pairs: AHashMap<(&[u8], &[u8]), usize> = AHashMap::new();
        let mut countries: AHashMap<&[u8], usize> = AHashMap::new();
        let mut areas: AHashMap<&[u8], usize> = AHashMap::new();
        let mut index = Vec::with_capacity(self.records.len());

        for record in &self.records {
            let record_offset = buffer.len();
            buffer.extend_from_slice(&record.end.to_le_bytes());
            let field_offset = buffer.len();

            let pair = (record.country.as_slice(), record.area.as_slice());
            if let Some(&target) = self.redirects.then(|| pairs.get(&pair)).flatten() {
                push_redirect(&mut buffer, RecordMode::RedirectSingle, target)?;
            } else {
                match self.redirects.then(|| countries.get(pair.0)).flatten() {
                    Some(&target) => {
                        push_redirect(&mut buffer, RecordMode::RedirectDouble, target)?;
                    }
                    None => {
                        countries.insert(pair.0, buffer.len());
                        push_cstring(&mut buffer, pair.0);
                    }
                }
                self.push_area(&mut buffer, &mut areas, pair.1)?;
                pairs.insert(pair, field_offset);
            }

            index.push((record.start, record_offset));
        }

        let index_start = buffer.len();
        for (start, record_offset) in index {
            buffer.extend_from_slice(&start.to_le_bytes());
            buffer.extend_from_slice(&(checked_offset(record_offset)? as u32).to_le_bytes()[..3]);
        }
        let index_end = index_start + (self.records.len() - 1) * INDEX_LEN;

        buffer[0..4].copy_from_slice(&(index_start as u32).to_le_bytes());
        buffer[4..8].copy_from_slice(&(index_end as u32).to_le_bytes());

        log::debug!(
            "Wrote database: {} ranges, {} bytes",
            self.records.len(),
            buffer.len()
        );

        Ok(buffer)
    }

    fn push_area<'a>(
        &self,
        buffer: &mut Vec<u8>,
        areas: &mut AHashMap<&'a [u8], usize>,
        area: &'a [u8],
    ) -> Result<()> {
        if self.redirects && !area.is_empty() {
            if let Some(&target) = areas.get(area) {
                return push_redirect(buffer, RecordMode::RedirectDouble, target);
            }
            areas.insert(area, buffer.len());
        }
        push_cstring(buffer, area);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(Error::Config("database needs at least one range".to_string()));
        }

        for record in &self.records {
            if record.start > record.end {
                return Err(Error::Config(format!(
                    "range start {:#x} is after end {:#x}",
                    record.start, record.end
                )));
            }
            for field in [&record.country, &record.area] {
                if field.contains(&0) {
                    return Err(Error::Config("strings must not contain NUL".to_string()));
                }
                if matches!(field.first(), Some(0x01 | 0x02)) {
                    return Err(Error::Config(
                        "strings must not start with a redirect mode byte".to_string(),
                    ));
                }
            }
        }

        for pair in self.records.windows(2) {
            if pair[0].end.checked_add(1) != Some(pair[1].start) {
                return Err(Error::Config(format!(
                    "range starting at {:#x} does not follow range ending at {:#x}",
                    pair[1].start, pair[0].end
                )));
            }
        }

        Ok(())
    }
}

fn checked_offset(offset: usize) -> Result<usize> {
    if offset > MAX_OFFSET {
        return Err(Error::Config(format!(
            "offset {:#x} exceeds 24-bit range",
            offset
        )));
    }
    Ok(offset)
}

fn push_redirect(buffer: &mut Vec<u8>, mode: RecordMode, target: usize) -> Result<()> {
    let target = checked_offset(target)? as u32;
    buffer.push(mode as u8);
    buffer.extend_from_slice(&target.to_le_bytes()[..3]);
    Ok(())
}

fn push_cstring(buffer: &mut Vec<u8>, value: &[u8]) {
    buffer.extend_from_slice(value);
    buffer.push(0);
}
