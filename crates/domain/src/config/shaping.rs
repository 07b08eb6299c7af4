use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Artificial latency injected by the shaping dialer. Disabled when both
/// delays are zero.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShapingConfig {
    #[serde(default)]
    pub connect_delay_ms: u64,

    #[serde(default)]
    pub io_delay_ms: u64,
}

impl ShapingConfig {
    pub fn is_enabled(&self) -> bool {
        self.connect_delay_ms > 0 || self.io_delay_ms > 0
    }

    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    pub fn io_delay(&self) -> Duration {
        Duration::from_millis(self.io_delay_ms)
    }
}
