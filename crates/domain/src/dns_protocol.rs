use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Upstream resolver endpoint, parsed from a URL-like string.
///
/// Addresses are kept as `host:port` strings: the dial layer is responsible
/// for resolving a hostname, so a `tls://dns.google:853` endpoint goes through
/// the same instrumented path as any other connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    System,
    Udp { addr: Arc<str> },
    Tcp { addr: Arc<str> },
    Tls { addr: Arc<str>, hostname: Arc<str> },
    Https { url: Arc<str>, hostname: Arc<str> },
}

impl DnsProtocol {
    /// Transport identifier, as reported by `DnsTransport::network`.
    pub fn network(&self) -> &'static str {
        match self {
            DnsProtocol::System => "system",
            DnsProtocol::Udp { .. } => "udp",
            DnsProtocol::Tcp { .. } => "tcp",
            DnsProtocol::Tls { .. } => "dot",
            DnsProtocol::Https { .. } => "doh",
        }
    }

    pub fn address(&self) -> &str {
        match self {
            DnsProtocol::System => "",
            DnsProtocol::Udp { addr } | DnsProtocol::Tcp { addr } | DnsProtocol::Tls { addr, .. } => {
                addr
            }
            DnsProtocol::Https { url, .. } => url,
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        match self {
            DnsProtocol::Tls { hostname, .. } | DnsProtocol::Https { hostname, .. } => {
                Some(hostname)
            }
            _ => None,
        }
    }
}

/// Splits `host:port`, accepting bracketed IPv6 literals.
pub fn split_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        if host.is_empty() || host.contains(':') {
            return None;
        }
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

fn parse_addr(kind: &str, addr_str: &str) -> Result<Arc<str>, String> {
    split_host_port(addr_str)
        .map(|_| Arc::from(addr_str))
        .ok_or_else(|| format!("Invalid {} address '{}'", kind, addr_str))
}

impl FromStr for DnsProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "system" || s.starts_with("system://") {
            return Ok(DnsProtocol::System);
        }
        if let Some(addr_str) = s.strip_prefix("udp://") {
            let addr = parse_addr("UDP", addr_str)?;
            return Ok(DnsProtocol::Udp { addr });
        }
        if let Some(addr_str) = s.strip_prefix("tcp://") {
            let addr = parse_addr("TCP", addr_str)?;
            return Ok(DnsProtocol::Tcp { addr });
        }
        if let Some(rest) = s.strip_prefix("tls://").or_else(|| s.strip_prefix("dot://")) {
            let (host, _) = split_host_port(rest).ok_or_else(|| {
                format!(
                    "Invalid TLS format '{}'. Expected 'tls://IP:PORT' or 'tls://HOSTNAME:PORT'",
                    s
                )
            })?;
            return Ok(DnsProtocol::Tls {
                addr: rest.into(),
                hostname: host.into(),
            });
        }
        if s.starts_with("https://") {
            let url: Arc<str> = s.into();
            let authority = s
                .strip_prefix("https://")
                .and_then(|rest| rest.split('/').next())
                .filter(|authority| !authority.is_empty())
                .ok_or_else(|| format!("Invalid HTTPS URL: {}", s))?;
            let hostname = split_host_port(authority)
                .map(|(host, _)| host)
                .unwrap_or(authority);
            return Ok(DnsProtocol::Https {
                url,
                hostname: hostname.into(),
            });
        }
        if split_host_port(s).is_some() {
            return Ok(DnsProtocol::Udp { addr: s.into() });
        }
        Err(format!("Invalid DNS endpoint format: '{}'. Expected: system:///, udp://HOST:PORT, tcp://HOST:PORT, tls://HOST:PORT, https://URL, or HOST:PORT", s))
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::System => write!(f, "system:///"),
            DnsProtocol::Udp { addr } => write!(f, "udp://{}", addr),
            DnsProtocol::Tcp { addr } => write!(f, "tcp://{}", addr),
            DnsProtocol::Tls { addr, .. } => write!(f, "tls://{}", addr),
            DnsProtocol::Https { url, .. } => write!(f, "{}", url),
        }
    }
}
