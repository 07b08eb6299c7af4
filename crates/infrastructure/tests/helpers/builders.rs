#![allow(dead_code)]
use ferrous_probe_domain::ProbeConfig;
use ferrous_probe_infrastructure::dialer::{build_dialer, Dialer, TlsHandshaker};
use ferrous_probe_infrastructure::dns::TransportOptions;
use ferrous_probe_infrastructure::events::EventEmitter;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

pub struct ProbeBuilder;

impl ProbeBuilder {
    pub fn config(endpoint: &str) -> ProbeConfig {
        let mut config = ProbeConfig::default();
        config.resolver.endpoint = endpoint.to_string();
        config.resolver.query_timeout_ms = TEST_QUERY_TIMEOUT.as_millis() as u64;
        config
    }

    pub fn udp_config(addr: SocketAddr) -> ProbeConfig {
        Self::config(&format!("udp://{}", addr))
    }

    pub fn dialer(emitter: &EventEmitter) -> Arc<dyn Dialer> {
        build_dialer(&ProbeConfig::default(), emitter.clone())
    }

    pub fn options(emitter: &EventEmitter) -> TransportOptions {
        TransportOptions::new(Self::dialer(emitter), emitter.clone())
            .with_query_timeout(TEST_QUERY_TIMEOUT)
    }

    /// Options whose TLS handshaker trusts only `config`'s roots.
    pub fn trusting_options(
        emitter: &EventEmitter,
        config: Arc<rustls::ClientConfig>,
    ) -> TransportOptions {
        let dialer = Self::dialer(emitter);
        let tls = TlsHandshaker::new(dialer.clone(), emitter.clone()).with_config(config);
        TransportOptions::new(dialer, emitter.clone())
            .with_tls(Arc::new(tls))
            .with_query_timeout(TEST_QUERY_TIMEOUT)
    }
}
