use crate::ports::Resolver;
use ferrous_probe_domain::ProbeError;
use std::sync::Arc;

pub struct LookupHostUseCase {
    resolver: Arc<dyn Resolver>,
}

impl LookupHostUseCase {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self { resolver }
    }

    pub async fn execute(&self, hostname: &str) -> Result<Vec<String>, ProbeError> {
        let hostname = hostname.trim().trim_end_matches('.');
        if hostname.is_empty() {
            return Err(ProbeError::InvalidDomainName(
                "hostname cannot be empty".to_string(),
            ));
        }
        self.resolver.lookup_host(hostname).await
    }
}
