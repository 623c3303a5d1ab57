//! Cached database lookups.
//!
//! Wraps a [`Database`] with a concurrent LRU cache keyed by address, for
//! workloads that query the same addresses repeatedly.

use quick_cache::sync::Cache;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use super::reader::{parse_ipv4, Database};
use crate::config::{CachedDatabaseConfig, DatabaseConfig};
use crate::{Location, Result};

/// Database with a lookup cache.
///
/// # Example
///
/// ```ignore
/// use qqwry::CachedDatabase;
///
/// let db = CachedDatabase::open("qqwry.dat")?;
/// let location = db.lookup("114.114.114.114");
/// ```
pub struct CachedDatabase<S = Vec<u8>> {
    inner: Database<S>,
    /// Lookup results, including misses.
    cache: Option<Cache<u32, Option<Location>>>,
    config: CachedDatabaseConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedDatabase<Vec<u8>> {
    /// Open a database file with default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::open_with_config(path, DatabaseConfig::default())?;
        Ok(Self::new(db, CachedDatabaseConfig::default()))
    }
}

impl<S: AsRef<[u8]>> CachedDatabase<S> {
    /// Wrap a loaded database.
    pub fn new(inner: Database<S>, config: CachedDatabaseConfig) -> Self {
        let cache = if config.cache_enabled && config.cache_capacity > 0 {
            Some(Cache::new(config.cache_capacity))
        } else {
            None
        };

        Self {
            inner,
            cache,
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a textual IPv4 address with caching.
    pub fn lookup(&self, ip: &str) -> Option<Location> {
        match parse_ipv4(ip) {
            Ok(ip) => self.lookup_ip(Ipv4Addr::from(ip)),
            Err(e) => {
                log::debug!("Rejected lookup: {}", e);
                None
            }
        }
    }

    /// Look up an IPv4 address with caching.
    pub fn lookup_ip(&self, ip: Ipv4Addr) -> Option<Location> {
        let Some(ref cache) = self.cache else {
            return self.inner.lookup_ip(ip);
        };

        let key = u32::from(ip);
        if let Some(result) = cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return result;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = self.inner.lookup_ip(ip);
        cache.insert(key, result.clone());
        result
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        if let Some(ref cache) = self.cache {
            cache.clear();
        }
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        match self.cache {
            Some(ref cache) => CacheStats {
                capacity: self.config.cache_capacity,
                len: cache.len(),
                enabled: true,
                hits: self.hits.load(Ordering::Relaxed),
                misses: self.misses.load(Ordering::Relaxed),
            },
            None => CacheStats::default(),
        }
    }

    /// The underlying database.
    pub fn inner(&self) -> &Database<S> {
        &self.inner
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Maximum cache capacity.
    pub capacity: usize,
    /// Current number of entries in the cache.
    pub len: usize,
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that went to the database.
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
