//! DNS over HTTPS (RFC 8484).
//!
//! Queries are POSTed with `application/dns-message`; the reply body is the
//! raw DNS message. The HTTP client keeps no idle connections, so every
//! round trip measures a fresh connection.
//!
//! ```text
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use super::{DnsTransport, RoundTripRecorder, TransportOptions};
use crate::dialer::{classify_rustls_error, classify_tls_error, ensure_crypto_provider};
use crate::events::EventEmitter;
use async_trait::async_trait;
use ferrous_probe_domain::{FailureKind, ProbeError};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use std::error::Error as _;
use std::io;
use std::time::Duration;

const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

pub struct HttpsTransport {
    url: String,
    client: reqwest::Client,
    emitter: EventEmitter,
    query_timeout: Duration,
}

impl HttpsTransport {
    pub fn new(url: &str, options: &TransportOptions) -> Result<Self, ProbeError> {
        ensure_crypto_provider();
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .map_err(|e| {
                ProbeError::InvalidEndpoint(format!("Failed to build DoH client for {}: {}", url, e))
            })?;
        Ok(Self::with_client(url, client, options))
    }

    /// Uses a caller-built client, e.g. one trusting a private root.
    pub fn with_client(url: &str, client: reqwest::Client, options: &TransportOptions) -> Self {
        Self {
            url: url.to_string(),
            client,
            emitter: options.emitter.clone(),
            query_timeout: options.query_timeout,
        }
    }

    async fn post(&self, query: &[u8], recorder: &RoundTripRecorder<'_>) -> Result<Vec<u8>, ProbeError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
            .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
            .body(query.to_vec())
            .send()
            .await
            .map_err(|e| recorder.error(classify_reqwest_error(&e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(recorder.error(FailureKind::HttpStatus(status.as_u16())));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::trim);
        if content_type != Some(DNS_MESSAGE_CONTENT_TYPE) {
            return Err(recorder.error(FailureKind::ContentTypeMismatch));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| recorder.error(classify_reqwest_error(&e)))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl DnsTransport for HttpsTransport {
    async fn round_trip(&self, query: &[u8]) -> Result<Vec<u8>, ProbeError> {
        let recorder =
            RoundTripRecorder::new("doh", &self.url, &self.emitter, self.query_timeout);

        recorder
            .record(query, async {
                match tokio::time::timeout(self.query_timeout, self.post(query, &recorder)).await {
                    Ok(result) => result,
                    Err(_) => Err(recorder.error(FailureKind::Timeout)),
                }
            })
            .await
    }

    fn requires_padding(&self) -> bool {
        true
    }

    fn network(&self) -> &'static str {
        "doh"
    }

    fn address(&self) -> &str {
        &self.url
    }
}

/// Finds the underlying I/O or TLS error in a reqwest error chain.
fn classify_reqwest_error(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        return FailureKind::Timeout;
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return classify_tls_error(io_err);
        }
        if let Some(tls_err) = cause.downcast_ref::<rustls::Error>() {
            return classify_rustls_error(tls_err);
        }
        source = cause.source();
    }
    FailureKind::Other(err.to_string())
}
