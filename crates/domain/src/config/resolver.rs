use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;
use crate::dns_protocol::DnsProtocol;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// `system:///`, `udp://ip:port`, `tcp://ip:port`, `tls://host:port`
    /// or a DoH `https://` URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,

    /// Wraps the resolver in the tracing decorator.
    #[serde(default = "default_true")]
    pub log_lookups: bool,
}

impl ResolverConfig {
    pub fn protocol(&self) -> Result<DnsProtocol, ConfigError> {
        self.endpoint.parse().map_err(ConfigError::Validation)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            query_timeout_ms: default_query_timeout(),
            log_lookups: true,
        }
    }
}

fn default_endpoint() -> String {
    "system:///".to_string()
}

fn default_query_timeout() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}
