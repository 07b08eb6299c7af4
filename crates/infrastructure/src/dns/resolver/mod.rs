//! Resolver implementations and the factory assembling the decorator chain.

mod idna;
mod logging;
mod serial;
mod system;

pub use idna::IdnaResolver;
pub use logging::LoggingResolver;
pub use serial::SerialResolver;
pub use system::SystemResolver;

use crate::dialer::{build_dialer, TlsHandshaker};
use crate::dns::transport::{new_transport, TransportOptions};
use crate::events::EventEmitter;
use ferrous_probe_application::ports::{AsnLookup, Resolver};
use ferrous_probe_domain::{DnsProtocol, ProbeConfig, ProbeError};
use std::sync::Arc;
use tracing::info;

/// Builds `Idna(Logging(Serial(transport)))`, or `Idna(Logging(System))`
/// for the `system:///` endpoint. The logging layer is left out when
/// `resolver.log_lookups` is off.
pub fn new_resolver(
    config: &ProbeConfig,
    emitter: EventEmitter,
    asn: Arc<dyn AsnLookup>,
) -> Result<Arc<dyn Resolver>, ProbeError> {
    let protocol = config.resolver.protocol()?;
    let query_timeout = config.resolver.query_timeout();

    let base: Arc<dyn Resolver> = match &protocol {
        DnsProtocol::System => Arc::new(SystemResolver::new(query_timeout)),
        other => {
            let dialer = build_dialer(config, emitter.clone());
            let tls = Arc::new(
                TlsHandshaker::new(dialer.clone(), emitter.clone())
                    .with_handshake_timeout(config.dial.tls_handshake_timeout()),
            );
            let options = TransportOptions::new(dialer, emitter.clone())
                .with_tls(tls)
                .with_query_timeout(query_timeout);
            let transport = new_transport(other, &options)?;
            Arc::new(SerialResolver::new(transport, asn).with_emitter(emitter))
        }
    };

    info!(
        endpoint = %protocol,
        network = base.network(),
        log_lookups = config.resolver.log_lookups,
        "Resolver ready"
    );

    let resolver: Arc<dyn Resolver> = if config.resolver.log_lookups {
        Arc::new(LoggingResolver::new(base))
    } else {
        base
    };
    Ok(Arc::new(IdnaResolver::new(resolver)))
}
