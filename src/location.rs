//! Lookup results.

use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// Region of a single queried address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// The queried address
    pub ip: Ipv4Addr,
    /// Country (or top-level region) name
    pub country: String,
    /// Area (city, ISP, ...) name, possibly empty
    pub area: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.ip, self.country, self.area)
    }
}

/// A contiguous address interval sharing one country/area label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range {
    /// First address of the range
    pub address_first: u32,
    /// Last address of the range (inclusive)
    pub address_last: u32,
    pub country: String,
    pub area: String,
}

impl Range {
    /// First address as dotted quad.
    pub fn first_ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.address_first)
    }

    /// Last address as dotted quad.
    pub fn last_ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.address_last)
    }

    /// Whether `ip` falls inside `[address_first, address_last]`.
    pub fn contains(&self, ip: u32) -> bool {
        self.address_first <= ip && ip <= self.address_last
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}\t{}\t{}",
            self.first_ip(),
            self.last_ip(),
            self.country,
            self.area
        )
    }
}
