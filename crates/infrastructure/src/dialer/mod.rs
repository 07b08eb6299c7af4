//! Instrumented connection setup.
//!
//! Every connect attempt and every TLS handshake emits exactly one
//! [`NetworkEvent`](ferrous_probe_domain::NetworkEvent), success or not.

mod base;
mod shaping;
mod tls;

pub use base::MeasuringDialer;
pub use shaping::{ShapedStream, ShapingDialer};
pub use tls::{ensure_crypto_provider, shared_tls_config, TlsHandshaker, TlsStream};
pub(crate) use tls::{classify_rustls_error, classify_tls_error};

use crate::dns::resolver::SystemResolver;
use crate::events::EventEmitter;
use async_trait::async_trait;
use ferrous_probe_domain::{ProbeConfig, ProbeError};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UdpSocket;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Byte stream returned by a [`Dialer`].
pub trait Conn: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> Conn for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

pub type BoxedConn = Box<dyn Conn>;

#[async_trait]
pub trait Dialer: Send + Sync {
    /// Opens a TCP connection to `host:port`.
    async fn connect(&self, address: &str) -> Result<BoxedConn, ProbeError>;

    /// Returns a UDP socket connected to `host:port`.
    async fn connect_udp(&self, address: &str) -> Result<UdpSocket, ProbeError>;
}

/// Dialer described by `config`: a [`MeasuringDialer`] resolving names with
/// the system resolver, wrapped in a [`ShapingDialer`] when shaping is on.
pub fn build_dialer(config: &ProbeConfig, emitter: EventEmitter) -> Arc<dyn Dialer> {
    let resolver = Arc::new(SystemResolver::new(config.resolver.query_timeout()));
    let dialer: Arc<dyn Dialer> = Arc::new(
        MeasuringDialer::new(resolver, emitter).with_connect_timeout(config.dial.connect_timeout()),
    );

    if config.shaping.is_enabled() {
        Arc::new(ShapingDialer::new(
            dialer,
            config.shaping.connect_delay(),
            config.shaping.io_delay(),
        ))
    } else {
        dialer
    }
}
