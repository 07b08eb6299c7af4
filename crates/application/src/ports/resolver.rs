use async_trait::async_trait;
use ferrous_probe_domain::ProbeError;

/// Resolves a hostname to its address literals.
///
/// `network` and `address` identify the upstream for logging and archival;
/// decorators forward them from the resolver they wrap.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn lookup_host(&self, hostname: &str) -> Result<Vec<String>, ProbeError>;

    fn network(&self) -> &str;

    fn address(&self) -> &str;
}
