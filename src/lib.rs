//! qqwry - reader for the QQWry offline IPv4 geolocation database.
//!
//! The database maps IPv4 ranges to a country and an area label. Lookups
//! binary-search a sorted index of range start addresses, then follow the
//! record's redirect chain to the (GBK-encoded) region strings.
//!
//! # Quick Start
//!
//! ```ignore
//! use qqwry::Database;
//!
//! let db = Database::open("qqwry.dat")?;
//!
//! if let Some(location) = db.lookup("114.114.114.114") {
//!     println!("{} {}", location.country, location.area);
//! }
//!
//! // Walk every range in index order
//! for range in db.enumerate_all() {
//!     println!("{}", range);
//! }
//! ```
//!
//! # Loading
//!
//! - [`Database::open`] reads the file into memory (`.gz` files are
//!   decompressed on the fly)
//! - [`Database::open_mmap`] memory-maps the file
//! - [`Database::from_bytes`] takes an in-memory buffer
//!
//! A loaded database is immutable and `Send + Sync`; share it behind an
//! `Arc` for concurrent lookups. [`CachedDatabase`] adds a lookup cache.
//!
//! # Export
//!
//! [`export::write_json`] streams every range as JSON.

mod codec;
mod config;
mod error;
mod location;

pub mod database;
pub mod export;

// Re-export core types
pub use codec::{GbkDecoder, TextDecoder, TextEncoding, Utf8Decoder};
pub use config::{CachedDatabaseConfig, DatabaseConfig, DEFAULT_CACHE_CAPACITY};
pub use error::{Error, Result};
pub use location::{Location, Range};

// Re-export database types
pub use database::{parse_ipv4, CacheStats, CachedDatabase, Database, DatabaseWriter, Ranges};
