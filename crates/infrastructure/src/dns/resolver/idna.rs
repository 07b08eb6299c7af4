use async_trait::async_trait;
use ferrous_probe_application::ports::Resolver;
use ferrous_probe_domain::ProbeError;
use std::sync::Arc;

/// Converts internationalized names to their punycode form before
/// delegating.
pub struct IdnaResolver {
    inner: Arc<dyn Resolver>,
}

impl IdnaResolver {
    pub fn new(inner: Arc<dyn Resolver>) -> Self {
        Self { inner }
    }
}

fn to_ascii(hostname: &str) -> Result<String, ProbeError> {
    if hostname.is_ascii() {
        return Ok(hostname.to_string());
    }
    idna::domain_to_ascii(hostname)
        .map_err(|e| ProbeError::InvalidDomainName(format!("'{}': {}", hostname, e)))
}

#[async_trait]
impl Resolver for IdnaResolver {
    async fn lookup_host(&self, hostname: &str) -> Result<Vec<String>, ProbeError> {
        let ascii = to_ascii(hostname)?;
        self.inner.lookup_host(&ascii).await
    }

    fn network(&self) -> &str {
        self.inner.network()
    }

    fn address(&self) -> &str {
        self.inner.address()
    }
}
