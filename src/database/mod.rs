//! QQWry binary database format.
//!
//! All integers are little-endian and all offsets are absolute from the
//! start of the buffer.
//!
//! # File Structure
//!
//! ```text
//! +------------------+
//! |     HEADER       |  8 bytes: index start (u32), index end (u32)
//! +------------------+
//! |     RECORDS      |  variable: end IP + country/area fields
//! +------------------+
//! |      INDEX       |  7-byte entries: start IP (u32) + record offset (u24)
//! +------------------+
//! ```
//!
//! Index entries are sorted by start IP. The index end offset points at the
//! last entry, not past it.

mod cached;
mod format;
mod index;
mod reader;
mod record;
mod store;
pub mod writer;


pub use cached::{CacheStats, CachedDatabase};
pub use format::*;
pub use index::IndexSearcher;
pub use reader::{parse_ipv4, Database, Ranges};
pub use record::{RawLocation, RecordResolver};
pub use store::ByteStore;
pub use writer::{DatabaseWriter, RangeRecord};
