//! DNS over TLS (RFC 7858): TCP framing inside a TLS session, one fresh
//! connection per query.

use super::tcp::{read_with_length_prefix, send_with_length_prefix};
use super::{DnsTransport, RoundTripRecorder, TransportOptions};
use crate::dialer::TlsHandshaker;
use crate::events::EventEmitter;
use async_trait::async_trait;
use ferrous_probe_domain::ProbeError;
use std::sync::Arc;
use std::time::Duration;

pub struct TlsTransport {
    address: String,
    hostname: String,
    tls: Arc<TlsHandshaker>,
    emitter: EventEmitter,
    query_timeout: Duration,
}

impl TlsTransport {
    pub fn new(address: &str, hostname: &str, options: &TransportOptions) -> Self {
        Self {
            address: address.to_string(),
            hostname: hostname.to_string(),
            tls: options.tls.clone(),
            emitter: options.emitter.clone(),
            query_timeout: options.query_timeout,
        }
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn round_trip(&self, query: &[u8]) -> Result<Vec<u8>, ProbeError> {
        let recorder =
            RoundTripRecorder::new("dot", &self.address, &self.emitter, self.query_timeout);

        recorder
            .record(query, async {
                let mut stream = self.tls.dial_tls(&self.address, &self.hostname).await?;
                recorder
                    .exchange(async {
                        send_with_length_prefix(&mut stream, query).await?;
                        read_with_length_prefix(&mut stream).await
                    })
                    .await
            })
            .await
    }

    fn requires_padding(&self) -> bool {
        true
    }

    fn network(&self) -> &'static str {
        "dot"
    }

    fn address(&self) -> &str {
        &self.address
    }
}
