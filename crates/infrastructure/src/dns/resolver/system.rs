use async_trait::async_trait;
use ferrous_probe_application::ports::Resolver;
use ferrous_probe_domain::{FailureKind, ProbeError};
use std::io;
use std::time::Duration;

/// Resolver backed by the operating system's `getaddrinfo`.
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Resolver for SystemResolver {
    async fn lookup_host(&self, hostname: &str) -> Result<Vec<String>, ProbeError> {
        let failed = |kind| ProbeError::Resolution {
            hostname: hostname.to_string(),
            kind,
        };

        let addrs = match tokio::time::timeout(self.timeout, tokio::net::lookup_host((hostname, 0)))
            .await
        {
            Ok(Ok(addrs)) => addrs,
            Ok(Err(e)) => return Err(failed(classify_lookup_error(&e))),
            Err(_) => return Err(failed(FailureKind::Timeout)),
        };

        let mut addresses: Vec<String> = Vec::new();
        for addr in addrs {
            let ip = addr.ip().to_string();
            if !addresses.contains(&ip) {
                addresses.push(ip);
            }
        }
        if addresses.is_empty() {
            return Err(failed(FailureKind::DnsNoAnswer));
        }
        Ok(addresses)
    }

    fn network(&self) -> &str {
        "system"
    }

    fn address(&self) -> &str {
        ""
    }
}

/// getaddrinfo reports a missing name only through its message text.
fn classify_lookup_error(err: &io::Error) -> FailureKind {
    let message = err.to_string();
    let nxdomain = [
        "Name or service not known",
        "No address associated",
        "nodename nor servname",
    ];
    if nxdomain.iter().any(|m| message.contains(m)) {
        FailureKind::DnsNxdomain
    } else {
        FailureKind::DnsLookupFailed
    }
}
