use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One observed network operation.
///
/// `started` is the offset from the beginning of the measurement, so events
/// emitted by different components share a single time base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum NetworkEvent {
    Connect(ConnectEvent),
    TlsHandshake(TlsHandshakeEvent),
    DnsRoundTrip(DnsRoundTripEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectEvent {
    pub network: String,
    pub address: String,
    pub started: Duration,
    pub duration: Duration,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsHandshakeEvent {
    pub address: String,
    pub server_name: String,
    pub started: Duration,
    pub duration: Duration,
    pub failure: Option<String>,
    pub tls_version: Option<String>,
    pub cipher_suite: Option<String>,
    pub negotiated_protocol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRoundTripEvent {
    pub network: String,
    pub address: String,
    pub started: Duration,
    pub duration: Duration,
    pub failure: Option<String>,
    pub query: Vec<u8>,
    pub reply: Option<Vec<u8>>,
}

impl NetworkEvent {
    pub fn started(&self) -> Duration {
        match self {
            Self::Connect(ev) => ev.started,
            Self::TlsHandshake(ev) => ev.started,
            Self::DnsRoundTrip(ev) => ev.started,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::Connect(ev) => ev.duration,
            Self::TlsHandshake(ev) => ev.duration,
            Self::DnsRoundTrip(ev) => ev.duration,
        }
    }

    pub fn address(&self) -> &str {
        match self {
            Self::Connect(ev) => &ev.address,
            Self::TlsHandshake(ev) => &ev.address,
            Self::DnsRoundTrip(ev) => &ev.address,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Connect(ev) => ev.failure.as_deref(),
            Self::TlsHandshake(ev) => ev.failure.as_deref(),
            Self::DnsRoundTrip(ev) => ev.failure.as_deref(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::TlsHandshake(_) => "tls_handshake",
            Self::DnsRoundTrip(_) => "dns_round_trip",
        }
    }
}
