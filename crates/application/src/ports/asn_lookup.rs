use ferrous_probe_domain::ASN_UNKNOWN;
use std::net::IpAddr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsnInfo {
    pub asn: i64,
    pub org_name: Option<String>,
}

impl AsnInfo {
    pub fn unknown() -> Self {
        Self {
            asn: ASN_UNKNOWN,
            org_name: None,
        }
    }
}

/// Maps an IP address to the autonomous system announcing it.
///
/// Implementations return [`AsnInfo::unknown`] instead of failing when the
/// address is not covered.
pub trait AsnLookup: Send + Sync {
    fn lookup(&self, ip: IpAddr) -> AsnInfo;
}
