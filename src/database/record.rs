//! Record resolution: follows the redirect protocol to the raw country and
//! area strings of a range.
//!
//! Record layout at `record_offset`:
//!
//! ```text
//! +---------+------+------------------------------------------+
//! | end IP  | mode | payload                                  |
//! | 4 bytes | 1    |                                          |
//! +---------+------+------------------------------------------+
//!   Direct:          country\0 area-field
//!   RedirectSingle:  u24 -> (country\0 area-field | 0x02 u24 area-field)
//!   RedirectDouble:  u24 -> country\0, then area-field after the offset
//! ```
//!
//! An area field is either an inline string or a redirect mode byte followed
//! by a u24 offset (zero meaning "no area"). Redirects never nest deeper than
//! two levels.

use super::format::{RecordMode, OFFSET_LEN};
use super::store::ByteStore;

/// Undecoded country and area bytes borrowed from the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLocation<'a> {
    pub country: &'a [u8],
    pub area: &'a [u8],
}

/// Resolves records of a loaded store.
pub struct RecordResolver<'a, S> {
    store: &'a ByteStore<S>,
}

impl<'a, S: AsRef<[u8]>> RecordResolver<'a, S> {
    pub fn new(store: &'a ByteStore<S>) -> Self {
        Self { store }
    }

    /// End IP stored at the head of the record.
    pub fn end_ip(&self, record_offset: u32) -> u32 {
        self.store.read_u32_le(record_offset as usize)
    }

    /// Resolve the country and area of the record at `record_offset`.
    pub fn resolve(&self, record_offset: u32) -> RawLocation<'a> {
        let offset = record_offset as usize;
        let mode_offset = offset + 4;

        match self.mode(mode_offset) {
            RecordMode::RedirectDouble => {
                let country_offset = self.redirect(mode_offset);
                RawLocation {
                    country: self.store.read_cstring(country_offset),
                    area: self.resolve_area(mode_offset + 1 + OFFSET_LEN),
                }
            }
            RecordMode::RedirectSingle => {
                let country_offset = self.redirect(mode_offset);
                let (country, area_offset) = match self.mode(country_offset) {
                    RecordMode::RedirectDouble => {
                        let string_offset = self.redirect(country_offset);
                        (
                            self.store.read_cstring(string_offset),
                            country_offset + 1 + OFFSET_LEN,
                        )
                    }
                    // Depth limit: a second RedirectSingle is read inline.
                    RecordMode::RedirectSingle | RecordMode::Direct => {
                        let country = self.store.read_cstring(country_offset);
                        (country, country_offset + country.len() + 1)
                    }
                };
                RawLocation {
                    country,
                    area: self.resolve_area(area_offset),
                }
            }
            RecordMode::Direct => {
                let country = self.store.read_cstring(mode_offset);
                RawLocation {
                    country,
                    area: self.resolve_area(mode_offset + country.len() + 1),
                }
            }
        }
    }

    fn resolve_area(&self, offset: usize) -> &'a [u8] {
        if self.mode(offset).is_redirect() {
            match self.redirect(offset) {
                0 => &[],
                area_offset => self.store.read_cstring(area_offset),
            }
        } else {
            self.store.read_cstring(offset)
        }
    }

    /// Mode byte at `offset`; past the buffer end reads as `Direct`, which
    /// in turn yields an empty string.
    fn mode(&self, offset: usize) -> RecordMode {
        self.store
            .read_u8(offset)
            .map(RecordMode::from_u8)
            .unwrap_or(RecordMode::Direct)
    }

    /// The u24 offset that follows the mode byte at `mode_offset`.
    fn redirect(&self, mode_offset: usize) -> usize {
        self.store.read_u24_le(mode_offset + 1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wrap `body` (placed at offset 15) behind a one-entry index.
    fn store(body: &[u8]) -> ByteStore<Vec<u8>> {
        let mut data = Vec::new();
        data.extend_from_slice(&8u32.to_le_bytes());
        data.extend_from_slice(&8u32.to_le_bytes());
        data.extend_from_slice(&[0, 0, 0, 0, 15, 0, 0]);
        data.extend_from_slice(body);
        ByteStore::load(data).unwrap()
    }

    fn u24(value: usize) -> [u8; 3] {
        let b = (value as u32).to_le_bytes();
        [b[0], b[1], b[2]]
    }

    #[test]
    fn test_direct_record() {
        let mut body = vec![0xff; 4];
        body.extend_from_slice(b"CN\0Beijing\0");
        let store = store(&body);
        let resolver = RecordResolver::new(&store);

        let raw = resolver.resolve(15);
        assert_eq!(raw.country, b"CN");
        assert_eq!(raw.area, b"Beijing");
        assert_eq!(resolver.end_ip(15), u32::MAX);
    }

    #[test]
    fn test_direct_record_with_redirected_area() {
        // 15: end ip, 19: "US\0", 22: 0x02 -> area at 26
        let mut body = vec![0; 4];
        body.extend_from_slice(b"US\0");
        body.push(0x02);
        body.extend_from_slice(&u24(26));
        body.extend_from_slice(b"Texas\0");
        let store = store(&body);

        let raw = RecordResolver::new(&store).resolve(15);
        assert_eq!(raw.country, b"US");
        assert_eq!(raw.area, b"Texas");
    }

    #[test]
    fn test_redirect_double_record() {
        // 15: end ip, 19: 0x02 -> 28, 23: area inline "Area\0", 28: "Country\0"
        let mut body = vec![0; 4];
        body.push(0x02);
        body.extend_from_slice(&u24(28));
        body.extend_from_slice(b"Area\0");
        body.extend_from_slice(b"Country\0");
        let store = store(&body);

        let raw = RecordResolver::new(&store).resolve(15);
        assert_eq!(raw.country, b"Country");
        assert_eq!(raw.area, b"Area");
    }

    #[test]
    fn test_redirect_single_record_inline_target() {
        // 15: end ip, 19: 0x01 -> 23, 23: "JP\0Tokyo\0"
        let mut body = vec![0; 4];
        body.push(0x01);
        body.extend_from_slice(&u24(23));
        body.extend_from_slice(b"JP\0Tokyo\0");
        let store = store(&body);

        let raw = RecordResolver::new(&store).resolve(15);
        assert_eq!(raw.country, b"JP");
        assert_eq!(raw.area, b"Tokyo");
    }

    #[test]
    fn test_redirect_single_then_double() {
        // 15: end ip, 19: 0x01 -> 23
        // 23: 0x02 -> 35, 27: 0x01 -> 0 (no area)
        // 31: padding, 35: "DE\0"
        let mut body = vec![0; 4];
        body.push(0x01);
        body.extend_from_slice(&u24(23));
        body.push(0x02);
        body.extend_from_slice(&u24(35));
        body.push(0x01);
        body.extend_from_slice(&u24(0));
        body.extend_from_slice(&[0; 4]);
        body.extend_from_slice(b"DE\0");
        let store = store(&body);

        let raw = RecordResolver::new(&store).resolve(15);
        assert_eq!(raw.country, b"DE");
        assert_eq!(raw.area, b"");
    }

    #[test]
    fn test_redirect_single_chain_stops_at_second_level() {
        // 15: end ip, 19: 0x01 -> 23, 23: 0x01 -> 27, 27: "KR\0Seoul\0"
        let mut body = vec![0; 4];
        body.push(0x01);
        body.extend_from_slice(&u24(23));
        body.push(0x01);
        body.extend_from_slice(&u24(27));
        body.extend_from_slice(b"KR\0Seoul\0");
        let store = store(&body);

        // The second 0x01 is read inline as the country string; its u24
        // offset is never followed.
        let raw = RecordResolver::new(&store).resolve(15);
        assert_eq!(raw.country, &[0x01, 27]);
        assert_eq!(raw.area, b"");
        assert_ne!(raw.country, b"KR");
    }

    #[test]
    fn test_truncated_record_is_not_fatal() {
        let mut body = vec![0; 4];
        body.extend_from_slice(b"FR");
        let store = store(&body);
        let resolver = RecordResolver::new(&store);

        let raw = resolver.resolve(15);
        assert_eq!(raw.country, b"FR");
        assert_eq!(raw.area, b"");

        let past_end = resolver.resolve(500);
        assert_eq!(past_end.country, b"");
        assert_eq!(past_end.area, b"");
        assert_eq!(resolver.end_ip(500), 0);
    }
}
