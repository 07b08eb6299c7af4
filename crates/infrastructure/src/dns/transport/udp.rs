//! DNS over UDP (RFC 1035 §4.2.1). Messages are sent as-is, one datagram
//! each way, on a fresh connected socket per query.

use super::{DnsTransport, RoundTripRecorder, TransportOptions};
use crate::dialer::Dialer;
use crate::events::EventEmitter;
use async_trait::async_trait;
use ferrous_probe_domain::ProbeError;
use std::sync::Arc;
use std::time::Duration;

const MAX_UDP_RESPONSE_SIZE: usize = 65535;

pub struct UdpTransport {
    address: String,
    dialer: Arc<dyn Dialer>,
    emitter: EventEmitter,
    query_timeout: Duration,
}

impl UdpTransport {
    pub fn new(address: &str, options: &TransportOptions) -> Self {
        Self {
            address: address.to_string(),
            dialer: options.dialer.clone(),
            emitter: options.emitter.clone(),
            query_timeout: options.query_timeout,
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn round_trip(&self, query: &[u8]) -> Result<Vec<u8>, ProbeError> {
        let recorder =
            RoundTripRecorder::new("udp", &self.address, &self.emitter, self.query_timeout);

        recorder
            .record(query, async {
                let socket = self.dialer.connect_udp(&self.address).await?;
                recorder
                    .exchange(async {
                        socket.send(query).await?;
                        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
                        let len = socket.recv(&mut buf).await?;
                        buf.truncate(len);
                        Ok(buf)
                    })
                    .await
            })
            .await
    }

    fn requires_padding(&self) -> bool {
        false
    }

    fn network(&self) -> &'static str {
        "udp"
    }

    fn address(&self) -> &str {
        &self.address
    }
}
