use async_trait::async_trait;
use ferrous_probe_application::ports::Resolver;
use ferrous_probe_domain::ProbeError;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Logs every lookup and its outcome, then returns the inner result as is.
pub struct LoggingResolver {
    inner: Arc<dyn Resolver>,
}

impl LoggingResolver {
    pub fn new(inner: Arc<dyn Resolver>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Resolver for LoggingResolver {
    async fn lookup_host(&self, hostname: &str) -> Result<Vec<String>, ProbeError> {
        debug!(
            hostname = hostname,
            network = self.inner.network(),
            address = self.inner.address(),
            "Resolve started"
        );

        let start = Instant::now();
        let result = self.inner.lookup_host(hostname).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(addrs) => info!(
                hostname = hostname,
                network = self.inner.network(),
                addresses = ?addrs,
                elapsed_ms = elapsed_ms,
                "Resolve done"
            ),
            Err(e) => warn!(
                hostname = hostname,
                network = self.inner.network(),
                failure = %e.failure(),
                elapsed_ms = elapsed_ms,
                "Resolve failed"
            ),
        }
        result
    }

    fn network(&self) -> &str {
        self.inner.network()
    }

    fn address(&self) -> &str {
        self.inner.address()
    }
}
