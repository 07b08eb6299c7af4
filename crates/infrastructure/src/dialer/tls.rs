use super::{BoxedConn, Dialer, DEFAULT_TLS_HANDSHAKE_TIMEOUT};
use crate::events::EventEmitter;
use ferrous_probe_domain::{DialPhase, FailureKind, NetworkEvent, ProbeError, TlsHandshakeEvent};
use rustls::pki_types::ServerName;
use rustls::{CertificateError, ClientConfig, ProtocolVersion};
use std::io;
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};
use tokio_rustls::TlsConnector;
use tracing::debug;

pub type TlsStream = tokio_rustls::client::TlsStream<BoxedConn>;

/// Installs the process-wide rustls crypto provider if none is set yet.
pub fn ensure_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

/// Client config trusting the webpki root set, built once.
static SHARED_TLS_CONFIG: LazyLock<Arc<ClientConfig>> = LazyLock::new(|| {
    ensure_crypto_provider();

    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(config)
});

pub fn shared_tls_config() -> Arc<ClientConfig> {
    SHARED_TLS_CONFIG.clone()
}

/// Runs TLS handshakes over connections from a [`Dialer`] and reports each
/// one as a `tls_handshake` event.
pub struct TlsHandshaker {
    dialer: Arc<dyn Dialer>,
    emitter: EventEmitter,
    config: Arc<ClientConfig>,
    handshake_timeout: Duration,
}

impl TlsHandshaker {
    pub fn new(dialer: Arc<dyn Dialer>, emitter: EventEmitter) -> Self {
        Self {
            dialer,
            emitter,
            config: shared_tls_config(),
            handshake_timeout: DEFAULT_TLS_HANDSHAKE_TIMEOUT,
        }
    }

    /// Replaces the client config, e.g. to trust a private root.
    pub fn with_config(mut self, config: Arc<ClientConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn with_alpn(mut self, protocols: &[&str]) -> Self {
        let mut config = (*self.config).clone();
        config.alpn_protocols = protocols.iter().map(|p| p.as_bytes().to_vec()).collect();
        self.config = Arc::new(config);
        self
    }

    /// Connects to `address` through the dialer, then handshakes with SNI
    /// `server_name`.
    pub async fn dial_tls(&self, address: &str, server_name: &str) -> Result<TlsStream, ProbeError> {
        let conn = self.dialer.connect(address).await?;
        self.handshake(conn, address, server_name).await
    }

    pub async fn handshake(
        &self,
        conn: BoxedConn,
        address: &str,
        server_name: &str,
    ) -> Result<TlsStream, ProbeError> {
        let started = Instant::now();
        let outcome = self.run_handshake(conn, server_name).await;
        let duration = started.elapsed();

        let info = match &outcome {
            Ok(stream) => SessionInfo::from_connection(stream.get_ref().1),
            Err(_) => SessionInfo::default(),
        };
        let failure = outcome.as_ref().err().map(ToString::to_string);
        debug!(
            address = address,
            server_name = server_name,
            elapsed_ms = duration.as_millis() as u64,
            tls_version = ?info.tls_version,
            failure = ?failure,
            "TLS handshake finished"
        );
        self.emitter.emit(NetworkEvent::TlsHandshake(TlsHandshakeEvent {
            address: address.to_string(),
            server_name: server_name.to_string(),
            started: self.emitter.offset(started),
            duration,
            failure,
            tls_version: info.tls_version,
            cipher_suite: info.cipher_suite,
            negotiated_protocol: info.negotiated_protocol,
        }));

        outcome.map_err(|kind| ProbeError::Dial {
            phase: DialPhase::TlsHandshake,
            address: address.to_string(),
            kind,
            elapsed: duration,
        })
    }

    async fn run_handshake(&self, conn: BoxedConn, server_name: &str) -> Result<TlsStream, FailureKind> {
        let name = ServerName::try_from(server_name.to_string())
            .map_err(|_| FailureKind::SslInvalidHostname)?;
        let connector = TlsConnector::from(self.config.clone());

        match tokio::time::timeout(self.handshake_timeout, connector.connect(name, conn)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(classify_tls_error(&e)),
            Err(_) => Err(FailureKind::Timeout),
        }
    }
}

#[derive(Default)]
struct SessionInfo {
    tls_version: Option<String>,
    cipher_suite: Option<String>,
    negotiated_protocol: Option<String>,
}

impl SessionInfo {
    fn from_connection(conn: &rustls::ClientConnection) -> Self {
        Self {
            tls_version: conn.protocol_version().map(|v| match v {
                ProtocolVersion::TLSv1_3 => "TLSv1.3".to_string(),
                ProtocolVersion::TLSv1_2 => "TLSv1.2".to_string(),
                other => format!("{:?}", other),
            }),
            cipher_suite: conn
                .negotiated_cipher_suite()
                .map(|suite| format!("{:?}", suite.suite())),
            negotiated_protocol: conn
                .alpn_protocol()
                .map(|p| String::from_utf8_lossy(p).into_owned()),
        }
    }
}

/// Maps a handshake I/O error to its failure kind. Certificate problems
/// surface as a `rustls::Error` wrapped in the `io::Error`.
pub(crate) fn classify_tls_error(err: &io::Error) -> FailureKind {
    let tls_error = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>());

    match tls_error {
        Some(tls_error) => classify_rustls_error(tls_error),
        None => FailureKind::from_io_error(err),
    }
}

pub(crate) fn classify_rustls_error(err: &rustls::Error) -> FailureKind {
    match err {
        rustls::Error::InvalidCertificate(cert) => classify_certificate_error(cert),
        _ => FailureKind::SslFailedHandshake,
    }
}

fn classify_certificate_error(err: &CertificateError) -> FailureKind {
    match err {
        CertificateError::NotValidForName => FailureKind::SslInvalidHostname,
        CertificateError::UnknownIssuer => FailureKind::SslUnknownAuthority,
        // Newer rustls reports name mismatches with context attached.
        other if format!("{:?}", other).starts_with("NotValidForName") => {
            FailureKind::SslInvalidHostname
        }
        _ => FailureKind::SslInvalidCertificate,
    }
}
