//! DNS over TCP (RFC 1035 §4.2.2): each message is preceded by its length
//! as a big-endian u16.

use super::{DnsTransport, RoundTripRecorder, TransportOptions};
use crate::dialer::Dialer;
use crate::events::EventEmitter;
use async_trait::async_trait;
use ferrous_probe_domain::ProbeError;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub struct TcpTransport {
    address: String,
    dialer: Arc<dyn Dialer>,
    emitter: EventEmitter,
    query_timeout: Duration,
}

impl TcpTransport {
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
impl DnsTransport for TcpTransport {
    async fn round_trip(&self, query: &[u8]) -> Result<Vec<u8>, ProbeError> {
        let recorder =
            RoundTripRecorder::new("tcp", &self.address, &self.emitter, self.query_timeout);

        recorder
            .record(query, async {
                let mut conn = self.dialer.connect(&self.address).await?;
                recorder
                    .exchange(async {
                        send_with_length_prefix(&mut conn, query).await?;
                        read_with_length_prefix(&mut conn).await
                    })
                    .await
            })
            .await
    }

    fn requires_padding(&self) -> bool {
        false
    }

    fn network(&self) -> &'static str {
        "tcp"
    }

    fn address(&self) -> &str {
        &self.address
    }
}

pub(crate) async fn send_with_length_prefix<S>(stream: &mut S, message: &[u8]) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let length = u16::try_from(message.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("DNS message too large: {} bytes", message.len()),
        )
    })?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message).await?;
    stream.flush().await
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await?;
    Ok(response)
}
