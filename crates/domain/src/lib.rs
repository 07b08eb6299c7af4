//! Ferrous Probe Domain Layer
pub mod archival;
pub mod config;
pub mod control;
pub mod dns_protocol;
pub mod errors;
pub mod events;
pub mod test_keys;

pub use archival::{
    DnsAnswerEntry, DnsQueryEntry, HttpRequestEntry, HttpResponse, TcpConnectEntry,
    TcpConnectStatus, TlsHandshakeEntry, ASN_UNKNOWN,
};
pub use config::{CliOverrides, ConfigError, ProbeConfig};
pub use control::{
    ControlDnsResult, ControlHttpRequest, ControlResponse, ControlTcpConnect,
    CONTROL_DNS_NAME_ERROR,
};
pub use dns_protocol::DnsProtocol;
pub use errors::{DialPhase, FailureKind, ProbeError};
pub use events::{ConnectEvent, DnsRoundTripEvent, NetworkEvent, TlsHandshakeEvent};
pub use test_keys::{Blocking, DnsConsistency, GetterTestKeys, TestKeys, Verdict};
