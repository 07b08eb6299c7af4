use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts for the instrumented dial layer, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_tls_handshake_timeout")]
    pub tls_handshake_timeout_ms: u64,
}

impl DialConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn tls_handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.tls_handshake_timeout_ms)
    }
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout(),
            tls_handshake_timeout_ms: default_tls_handshake_timeout(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    15_000
}

fn default_tls_handshake_timeout() -> u64 {
    10_000
}
