//! Database reader: header, index search, record resolution and decoding.

use flate2::read::GzDecoder;
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::Read;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::sync::Arc;

use super::format::{Header, IndexEntry};
use super::index::IndexSearcher;
use super::record::RecordResolver;
use super::store::ByteStore;
use crate::codec::TextDecoder;
use crate::config::DatabaseConfig;
use crate::{Error, Location, Range, Result};

/// Area placeholder used by QQWry for ranges without area information.
const AREA_PLACEHOLDER: &str = "CZ88.NET";

/// Parse a dotted-quad address into its big-endian integer value.
///
/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) are accepted as well.
/// Surrounding whitespace is rejected.
pub fn parse_ipv4(input: &str) -> Result<u32> {
    match input.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => Ok(u32::from(v4)),
        Ok(IpAddr::V6(v6)) => v6
            .to_ipv4_mapped()
            .map(u32::from)
            .ok_or_else(|| Error::InvalidInput(format!("not an IPv4 address: {}", input))),
        Err(_) => Err(Error::InvalidInput(format!("invalid IP address: {}", input))),
    }
}

/// An immutable, loaded QQWry database.
///
/// Lookups only read the buffer, so a `Database` can be shared across
/// threads without locking.
pub struct Database<S = Vec<u8>> {
    store: ByteStore<S>,
    decoder: Arc<dyn TextDecoder>,
    strip_placeholder: bool,
}

impl Database<Vec<u8>> {
    /// Open a database file with default configuration.
    ///
    /// Files ending in `.gz` are decompressed while loading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, DatabaseConfig::default())
    }

    /// Open a database file with custom configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: DatabaseConfig) -> Result<Self> {
        let path = path.as_ref();
        let is_gzip = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("gz"));

        let data = if is_gzip {
            let mut decoder = GzDecoder::new(File::open(path)?);
            let mut data = Vec::new();
            decoder.read_to_end(&mut data)?;
            data
        } else {
            fs::read(path)?
        };

        log::debug!("Read {} bytes from {:?}", data.len(), path);
        Self::from_source(data, config)
    }

    /// Load a database from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_source(data, DatabaseConfig::default())
    }

    /// Load a database from bytes with custom configuration.
    pub fn from_bytes_with_config(data: Vec<u8>, config: DatabaseConfig) -> Result<Self> {
        Self::from_source(data, config)
    }
}

impl Database<Mmap> {
    /// Memory-map a database file with default configuration.
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_mmap_with_config(path, DatabaseConfig::default())
    }

    /// Memory-map a database file with custom configuration.
    pub fn open_mmap_with_config(path: impl AsRef<Path>, config: DatabaseConfig) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        // The file must not be modified while mapped.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_source(mmap, config)
    }
}

impl<S: AsRef<[u8]>> Database<S> {
    /// Load a database from any byte storage.
    pub fn from_source(data: S, config: DatabaseConfig) -> Result<Self> {
        let store = ByteStore::load(data)?;

        log::info!(
            "Loaded QQWry database: {} ranges, {} bytes, {} encoding",
            store.header().total(),
            store.len(),
            config.encoding
        );

        Ok(Self {
            store,
            decoder: config.encoding.decoder(),
            strip_placeholder: config.strip_placeholder,
        })
    }

    /// Replace the text decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn TextDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// The file header.
    pub fn header(&self) -> &Header {
        self.store.header()
    }

    /// Number of ranges in the database.
    pub fn total(&self) -> usize {
        self.store.header().total()
    }

    /// Size of the underlying buffer in bytes.
    pub fn size(&self) -> usize {
        self.store.len()
    }

    /// Look up a textual IPv4 address.
    ///
    /// Returns `None` if the input does not parse or no range contains it.
    pub fn lookup(&self, ip: &str) -> Option<Location> {
        match parse_ipv4(ip) {
            Ok(ip) => self.lookup_ip(Ipv4Addr::from(ip)),
            Err(e) => {
                log::debug!("Rejected lookup: {}", e);
                None
            }
        }
    }

    /// Look up an IPv4 address.
    pub fn lookup_ip(&self, ip: Ipv4Addr) -> Option<Location> {
        let entry = IndexSearcher::new(&self.store).find(u32::from(ip))?;
        let (country, area) = self.decode_record(entry.record_offset);
        Some(Location { ip, country, area })
    }

    /// The full range containing `ip`.
    pub fn find_range(&self, ip: Ipv4Addr) -> Option<Range> {
        let entry = IndexSearcher::new(&self.store).find(u32::from(ip))?;
        Some(self.range_for(entry))
    }

    /// Iterate over every range in index order.
    ///
    /// Each call starts a fresh pass over the index.
    pub fn enumerate_all(&self) -> Ranges<'_, S> {
        Ranges {
            db: self,
            position: 0,
            total: self.total(),
        }
    }

    fn decode_record(&self, record_offset: u32) -> (String, String) {
        let raw = RecordResolver::new(&self.store).resolve(record_offset);
        let country = self.decoder.decode(raw.country);
        let mut area = self.decoder.decode(raw.area);
        if self.strip_placeholder && area.trim() == AREA_PLACEHOLDER {
            area.clear();
        }
        (country, area)
    }

    fn range_for(&self, entry: IndexEntry) -> Range {
        let (country, area) = self.decode_record(entry.record_offset);
        Range {
            address_first: entry.start_ip,
            address_last: RecordResolver::new(&self.store).end_ip(entry.record_offset),
            country,
            area,
        }
    }
}

/// Iterator over all ranges of a [`Database`], in ascending start order.
pub struct Ranges<'a, S> {
    db: &'a Database<S>,
    position: usize,
    total: usize,
}

impl<S: AsRef<[u8]>> Iterator for Ranges<'_, S> {
    type Item = Range;

    fn next(&mut self) -> Option<Range> {
        if self.position >= self.total {
            return None;
        }
        let entry = IndexSearcher::new(&self.db.store).entry(self.position);
        let range = self.db.range_for(entry);
        self.position += 1;
        Some(range)
    }

    fn nth(&mut self, n: usize) -> Option<Range> {
        self.position = self.position.saturating_add(n).min(self.total);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.position;
        (remaining, Some(remaining))
    }
}

impl<S: AsRef<[u8]>> ExactSizeIterator for Ranges<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_ipv4("1.2.3.4").unwrap(), 0x01020304);
        assert_eq!(parse_ipv4("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(parse_ipv4("::ffff:10.0.0.1").unwrap(), 0x0a000001);
    }

    #[test]
    fn test_parse_ipv4_rejects() {
        for input in [
            "",
            "1.2.3",
            "1.2.3.256",
            "example.com",
            "2001:db8::1",
            " 1.2.3.4 ",
            "1.2.3.4\n",
        ] {
            assert!(
                matches!(parse_ipv4(input), Err(Error::InvalidInput(_))),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_database_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Database<Vec<u8>>>();
        assert_send_sync::<Database<Mmap>>();
    }
}
