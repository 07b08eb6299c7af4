//! DNS transports: UDP, TCP, DNS-over-TLS and DNS-over-HTTPS.
//!
//! Each round trip emits one `dns_round_trip` event carrying the raw query
//! and, when one arrived, the raw reply. Connections come from the
//! instrumented dialer, so the connect and handshake events land in the
//! same stream.

pub mod https;
pub mod tcp;
pub mod tls;
pub mod udp;

pub use https::HttpsTransport;
pub use tcp::TcpTransport;
pub use tls::TlsTransport;
pub use udp::UdpTransport;

use crate::dialer::{Dialer, TlsHandshaker};
use crate::events::EventEmitter;
use async_trait::async_trait;
use ferrous_probe_domain::{DnsProtocol, DnsRoundTripEvent, FailureKind, NetworkEvent, ProbeError};
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Sends one wire-format query and returns the raw reply.
    async fn round_trip(&self, query: &[u8]) -> Result<Vec<u8>, ProbeError>;

    /// Whether queries should carry EDNS(0) padding before being sent.
    fn requires_padding(&self) -> bool;

    fn network(&self) -> &'static str;

    fn address(&self) -> &str;
}

/// What a transport needs besides its endpoint.
#[derive(Clone)]
pub struct TransportOptions {
    pub dialer: Arc<dyn Dialer>,
    pub tls: Arc<TlsHandshaker>,
    pub emitter: EventEmitter,
    pub query_timeout: Duration,
}

impl TransportOptions {
    pub fn new(dialer: Arc<dyn Dialer>, emitter: EventEmitter) -> Self {
        let tls = Arc::new(TlsHandshaker::new(dialer.clone(), emitter.clone()));
        Self {
            dialer,
            tls,
            emitter,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_tls(mut self, tls: Arc<TlsHandshaker>) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

pub fn new_transport(
    protocol: &DnsProtocol,
    options: &TransportOptions,
) -> Result<Arc<dyn DnsTransport>, ProbeError> {
    let transport: Arc<dyn DnsTransport> = match protocol {
        DnsProtocol::Udp { addr } => Arc::new(UdpTransport::new(addr, options)),
        DnsProtocol::Tcp { addr } => Arc::new(TcpTransport::new(addr, options)),
        DnsProtocol::Tls { addr, hostname } => {
            Arc::new(TlsTransport::new(addr, hostname, options))
        }
        DnsProtocol::Https { url, .. } => Arc::new(HttpsTransport::new(url, options)?),
        DnsProtocol::System => {
            return Err(ProbeError::InvalidEndpoint(
                "the system resolver has no DNS transport".to_string(),
            ))
        }
    };
    Ok(transport)
}

/// Times one round trip and reports it as a `dns_round_trip` event.
pub(crate) struct RoundTripRecorder<'a> {
    network: &'static str,
    address: &'a str,
    emitter: &'a EventEmitter,
    timeout: Duration,
}

impl<'a> RoundTripRecorder<'a> {
    pub(crate) fn new(
        network: &'static str,
        address: &'a str,
        emitter: &'a EventEmitter,
        timeout: Duration,
    ) -> Self {
        Self {
            network,
            address,
            emitter,
            timeout,
        }
    }

    pub(crate) fn error(&self, kind: FailureKind) -> ProbeError {
        ProbeError::Transport {
            network: self.network,
            address: self.address.to_string(),
            kind,
            elapsed: Duration::ZERO,
        }
    }

    /// Runs the I/O half of a round trip under the query timeout.
    pub(crate) async fn exchange<T, F>(&self, io: F) -> Result<T, ProbeError>
    where
        F: Future<Output = io::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, io).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(self.error(FailureKind::from_io_error(&e))),
            Err(_) => Err(self.error(FailureKind::Timeout)),
        }
    }

    pub(crate) async fn record<F>(&self, query: &[u8], round_trip: F) -> Result<Vec<u8>, ProbeError>
    where
        F: Future<Output = Result<Vec<u8>, ProbeError>>,
    {
        let started = Instant::now();
        let mut result = round_trip.await;
        let duration = started.elapsed();

        if let Err(ProbeError::Transport { elapsed, .. }) = &mut result {
            *elapsed = duration;
        }

        let failure = result.as_ref().err().map(ProbeError::failure);
        debug!(
            network = self.network,
            address = self.address,
            elapsed_ms = duration.as_millis() as u64,
            reply_len = result.as_ref().map(Vec::len).unwrap_or(0),
            failure = ?failure,
            "DNS round trip finished"
        );
        self.emitter.emit(NetworkEvent::DnsRoundTrip(DnsRoundTripEvent {
            network: self.network.to_string(),
            address: self.address.to_string(),
            started: self.emitter.offset(started),
            duration,
            failure,
            query: query.to_vec(),
            reply: result.as_ref().ok().cloned(),
        }));

        result
    }
}
