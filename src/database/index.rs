//! Binary search over the sorted start-IP index.

use super::format::IndexEntry;
use super::store::ByteStore;

/// Searches the index of a loaded store.
pub struct IndexSearcher<'a, S> {
    store: &'a ByteStore<S>,
}

impl<'a, S: AsRef<[u8]>> IndexSearcher<'a, S> {
    pub fn new(store: &'a ByteStore<S>) -> Self {
        Self { store }
    }

    /// Number of index entries.
    pub fn total(&self) -> usize {
        self.store.header().total()
    }

    /// The `i`-th index entry. `i` must be below `total()`.
    pub fn entry(&self, i: usize) -> IndexEntry {
        self.store.read_entry(self.store.header().entry_offset(i))
    }

    /// Last address covered by the final entry: the end IP stored at the
    /// head of its record. There is no entry after it to bound the range.
    pub fn last_address(&self) -> u32 {
        let last = self.entry(self.total() - 1);
        self.store.read_u32_le(last.record_offset as usize)
    }

    /// Find the entry whose range contains `ip`.
    ///
    /// Entry `i` covers `[start_ip(i), start_ip(i + 1))`; the final entry
    /// covers `[start_ip, last_address()]`.
    pub fn find(&self, ip: u32) -> Option<IndexEntry> {
        let total = self.total();
        let (mut lo, mut hi) = (0, total - 1);

        if lo == hi {
            return self.match_last(ip);
        }

        loop {
            let mid = lo + (hi - lo) / 2;
            let entry = self.entry(mid);

            if hi - lo == 1 {
                // mid == lo; hi is the adjacent entry and bounds the range.
                let next = self.entry(hi);
                if ip < next.start_ip {
                    return (ip >= entry.start_ip).then_some(entry);
                }
                if hi == total - 1 {
                    return self.match_last(ip);
                }
                return None;
            }

            if entry.start_ip > ip {
                hi = mid;
            } else if entry.start_ip < ip {
                lo = mid;
            } else {
                return Some(entry);
            }
        }
    }

    fn match_last(&self, ip: u32) -> Option<IndexEntry> {
        let last = self.entry(self.total() - 1);
        (last.start_ip <= ip && ip <= self.last_address()).then_some(last)
    }
}
