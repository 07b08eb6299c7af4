//! [`AsnLookup`] implementations that need no GeoIP database.

use ferrous_probe_application::ports::{AsnInfo, AsnLookup};
use std::collections::HashMap;
use std::net::IpAddr;

/// Reports every address as unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAsnLookup;

impl AsnLookup for NoAsnLookup {
    fn lookup(&self, _ip: IpAddr) -> AsnInfo {
        AsnInfo::unknown()
    }
}

/// Fixed address table, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticAsnLookup {
    entries: HashMap<IpAddr, AsnInfo>,
}

impl StaticAsnLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ip: IpAddr, asn: i64, org_name: Option<&str>) -> Self {
        self.entries.insert(
            ip,
            AsnInfo {
                asn,
                org_name: org_name.map(str::to_string),
            },
        );
        self
    }
}

impl AsnLookup for StaticAsnLookup {
    fn lookup(&self, ip: IpAddr) -> AsnInfo {
        self.entries.get(&ip).cloned().unwrap_or_else(AsnInfo::unknown)
    }
}
