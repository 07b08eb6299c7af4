use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Failure string the control returns when the domain does not exist.
pub const CONTROL_DNS_NAME_ERROR: &str = "dns_name_error";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlDnsResult {
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub addrs: Vec<String>,
    /// Parallel to `addrs`; 0 means the ASN is unknown.
    #[serde(default)]
    pub asns: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlHttpRequest {
    #[serde(default)]
    pub body_length: i64,
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub status_code: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlTcpConnect {
    pub status: bool,
    #[serde(default)]
    pub failure: Option<String>,
}

/// What the control observed for the same URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlResponse {
    #[serde(default)]
    pub tcp_connect: BTreeMap<String, ControlTcpConnect>,
    #[serde(default)]
    pub http_request: ControlHttpRequest,
    #[serde(default)]
    pub dns: ControlDnsResult,
}
