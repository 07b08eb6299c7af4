use crate::di::ProbeServices;
use ferrous_probe_domain::ProbeConfig;
use ferrous_probe_infrastructure::archival::archive_events;
use serde_json::{json, Value};
use tracing::warn;

pub async fn lookup(config: &ProbeConfig, hostname: &str) -> anyhow::Result<Value> {
    let (services, mut collector) = ProbeServices::new(config)?;

    let result = services.lookup_host.execute(hostname).await;
    if let Err(ref e) = result {
        warn!(hostname = %hostname, error = %e, "Lookup failed");
    }

    let resolver = json!({
        "network": services.resolver.network(),
        "address": services.resolver.address(),
    });
    let events = collector.drain();
    let archived = archive_events(&events, services.asn.as_ref());

    Ok(json!({
        "hostname": hostname,
        "resolver": resolver,
        "addresses": result.as_ref().ok(),
        "failure": result.as_ref().err().map(|e| e.failure()),
        "queries": archived.queries,
        "tcp_connect": archived.tcp_connect,
        "tls_handshakes": archived.tls_handshakes,
        "network_events": events,
    }))
}
