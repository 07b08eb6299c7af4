use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Stage of a dial that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialPhase {
    Connect,
    TlsHandshake,
}

impl DialPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::TlsHandshake => "tls_handshake",
        }
    }
}

impl fmt::Display for DialPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precise reason a network operation failed.
///
/// The `Display` form is the stable failure string written into test keys,
/// so analysis code can compare failures across measurement and control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Timeout,
    ConnectionRefused,
    ConnectionReset,
    HostUnreachable,
    NetworkUnreachable,
    Eof,
    DnsNxdomain,
    DnsServerFailure,
    DnsRefused,
    DnsNoAnswer,
    DnsMalformedResponse,
    DnsLookupFailed,
    SslInvalidHostname,
    SslUnknownAuthority,
    SslInvalidCertificate,
    SslFailedHandshake,
    /// DoH server answered with a status other than 200.
    HttpStatus(u16),
    /// DoH server answered with something that is not `application/dns-message`.
    ContentTypeMismatch,
    Other(String),
}

impl FailureKind {
    pub const NXDOMAIN: &'static str = "dns_nxdomain_error";

    pub fn from_io_error(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout,
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                Self::ConnectionReset
            }
            io::ErrorKind::HostUnreachable => Self::HostUnreachable,
            io::ErrorKind::NetworkUnreachable => Self::NetworkUnreachable,
            io::ErrorKind::UnexpectedEof => Self::Eof,
            _ => Self::Other(err.to_string()),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("generic_timeout_error"),
            Self::ConnectionRefused => f.write_str("connection_refused"),
            Self::ConnectionReset => f.write_str("connection_reset"),
            Self::HostUnreachable => f.write_str("host_unreachable"),
            Self::NetworkUnreachable => f.write_str("network_unreachable"),
            Self::Eof => f.write_str("eof_error"),
            Self::DnsNxdomain => f.write_str(Self::NXDOMAIN),
            Self::DnsServerFailure => f.write_str("dns_server_failure"),
            Self::DnsRefused => f.write_str("dns_refused_error"),
            Self::DnsNoAnswer => f.write_str("dns_no_answer"),
            Self::DnsMalformedResponse => f.write_str("dns_malformed_response"),
            Self::DnsLookupFailed => f.write_str("dns_lookup_error"),
            Self::SslInvalidHostname => f.write_str("ssl_invalid_hostname"),
            Self::SslUnknownAuthority => f.write_str("ssl_unknown_authority"),
            Self::SslInvalidCertificate => f.write_str("ssl_invalid_certificate"),
            Self::SslFailedHandshake => f.write_str("ssl_failed_handshake"),
            Self::HttpStatus(code) => write!(f, "http_status_{}", code),
            Self::ContentTypeMismatch => f.write_str("doh_invalid_content_type"),
            Self::Other(msg) => write!(f, "unknown_failure: {}", msg),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ProbeError {
    #[error("{phase} to {address} failed after {}ms: {kind}", .elapsed.as_millis())]
    Dial {
        phase: DialPhase,
        address: String,
        kind: FailureKind,
        elapsed: Duration,
    },

    #[error("{network} round trip via {address} failed after {}ms: {kind}", .elapsed.as_millis())]
    Transport {
        network: &'static str,
        address: String,
        kind: FailureKind,
        elapsed: Duration,
    },

    #[error("Resolving {hostname} failed: {kind}")]
    Resolution { hostname: String, kind: FailureKind },

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::config::ConfigError> for ProbeError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl ProbeError {
    pub fn kind(&self) -> Option<&FailureKind> {
        match self {
            Self::Dial { kind, .. }
            | Self::Transport { kind, .. }
            | Self::Resolution { kind, .. } => Some(kind),
            Self::InvalidDomainName(_) | Self::InvalidEndpoint(_) | Self::Config(_) => None,
        }
    }

    /// Failure string recorded verbatim in test keys.
    pub fn failure(&self) -> String {
        match self.kind() {
            Some(kind) => kind.to_string(),
            None => FailureKind::Other(self.to_string()).to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind(), Some(FailureKind::Timeout))
    }

    pub fn phase(&self) -> Option<DialPhase> {
        match self {
            Self::Dial { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
