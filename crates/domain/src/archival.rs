//! Archival records derived from network events.
//!
//! These are the JSON shapes stored in a measurement. Answers keep insertion
//! order for replay; analysis code treats them as sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Sentinel ASN meaning "lookup unavailable". Never a real ASN.
pub const ASN_UNKNOWN: i64 = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsAnswerEntry {
    pub answer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(default)]
    pub asn: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_org_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl DnsAnswerEntry {
    pub fn from_ip(ip: IpAddr, asn: i64, ttl: Option<u32>) -> Self {
        match ip {
            IpAddr::V4(v4) => Self {
                answer_type: "A".into(),
                ipv4: Some(v4.to_string()),
                asn,
                ttl,
                ..Default::default()
            },
            IpAddr::V6(v6) => Self {
                answer_type: "AAAA".into(),
                ipv6: Some(v6.to_string()),
                asn,
                ttl,
                ..Default::default()
            },
        }
    }

    /// The address literal, whichever family it is.
    pub fn address(&self) -> Option<&str> {
        self.ipv4.as_deref().or(self.ipv6.as_deref())
    }

    pub fn has_known_asn(&self) -> bool {
        self.asn != ASN_UNKNOWN
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsQueryEntry {
    pub hostname: String,
    pub query_type: String,
    #[serde(default)]
    pub answers: Vec<DnsAnswerEntry>,
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub engine: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resolver_address: String,
    #[serde(default)]
    pub t: f64,
}

impl DnsQueryEntry {
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.answers.iter().filter_map(DnsAnswerEntry::address)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpConnectStatus {
    pub success: bool,
    #[serde(default)]
    pub failure: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TcpConnectEntry {
    pub ip: String,
    pub port: u16,
    pub status: TcpConnectStatus,
    #[serde(default)]
    pub t: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TlsHandshakeEntry {
    pub address: String,
    pub server_name: String,
    #[serde(default)]
    pub tls_version: Option<String>,
    #[serde(default)]
    pub cipher_suite: Option<String>,
    #[serde(default)]
    pub negotiated_protocol: Option<String>,
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub t: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body_length: i64,
    #[serde(default)]
    pub body_is_truncated: bool,
    /// Already-extracted `<title>` of the body.
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequestEntry {
    pub url: String,
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub response: HttpResponse,
}
