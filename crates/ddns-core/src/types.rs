//! Value types shared by the engine and its collaborators

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::Error;

/// Default TTL for the managed record (one hour)
pub const DEFAULT_TTL_SECS: u32 = 3600;

/// A validated IPv4 address
///
/// Parsing trims surrounding whitespace and nothing else: the remainder must
/// be a dotted quad with four octets in `0..=255`. Equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpAddress(Ipv4Addr);

impl IpAddress {
    /// Wrap an already-parsed address
    pub const fn new(addr: Ipv4Addr) -> Self {
        Self(addr)
    }

    /// The underlying address
    pub fn addr(&self) -> Ipv4Addr {
        self.0
    }
}

impl FromStr for IpAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<Ipv4Addr>()
            .map(Self)
            .map_err(|_| Error::invalid_input(format!("not an IPv4 address: {:?}", trimmed)))
    }
}

impl TryFrom<String> for IpAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IpAddress> for String {
    fn from(ip: IpAddress) -> Self {
        ip.to_string()
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr)
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// DNS record type managed by the updater
///
/// Only IPv4 `A` records are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4)
    #[default]
    A,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single record a run reconciles
///
/// Identifies exactly one record within exactly one hosted zone. Built once
/// from configuration and never modified during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordTarget {
    /// Hosted zone ID (e.g. "Z0123456789ABCDEFGHIJ")
    pub zone_id: String,
    /// Fully qualified record name (e.g. "home.example.com")
    pub record_name: String,
    /// Record type, always `A`
    pub record_type: RecordType,
    /// TTL written on upsert
    pub ttl_secs: u32,
}

impl DnsRecordTarget {
    /// Create a target with the default TTL
    pub fn new(zone_id: impl Into<String>, record_name: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            record_name: record_name.into(),
            record_type: RecordType::A,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl_secs: u32) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

impl fmt::Display for DnsRecordTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (zone {})",
            self.record_type, self.record_name, self.zone_id
        )
    }
}
