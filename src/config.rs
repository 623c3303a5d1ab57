//! Configuration types.

use crate::codec::TextEncoding;

/// Default cache capacity (number of entries).
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Configuration for opening a database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Encoding of stored region names
    pub encoding: TextEncoding,
    /// Map the " CZ88.NET" area placeholder to an empty string
    pub strip_placeholder: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Gbk,
            strip_placeholder: true,
        }
    }
}

impl DatabaseConfig {
    /// Use a different text encoding.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Keep area placeholders as stored.
    pub fn keep_placeholder(mut self) -> Self {
        self.strip_placeholder = false;
        self
    }
}

/// Lookup memoization settings for [`CachedDatabase`](crate::CachedDatabase).
///
/// Results are keyed by IPv4 address, misses included, so capacity is
/// counted in distinct addresses rather than ranges.
#[derive(Debug, Clone)]
pub struct CachedDatabaseConfig {
    /// Distinct addresses kept before the least recently used are evicted.
    pub cache_capacity: usize,
    /// When false, every lookup goes straight to the index search.
    pub cache_enabled: bool,
}

impl Default for CachedDatabaseConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_enabled: true,
        }
    }
}

impl CachedDatabaseConfig {
    /// Memoize up to `capacity` addresses.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache_capacity: capacity,
            cache_enabled: true,
        }
    }

    /// Pass every lookup through to the database.
    pub fn no_cache() -> Self {
        Self {
            cache_capacity: 0,
            cache_enabled: false,
        }
    }
}
