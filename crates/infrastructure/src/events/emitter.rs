use super::collector::EventCollector;
use ferrous_probe_domain::NetworkEvent;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Sending half of the measurement's event channel.
///
/// Clones share the channel and the measurement start instant, so every
/// event's `started` offset is on the same time base.
#[derive(Clone)]
pub struct EventEmitter {
    sender: Option<mpsc::UnboundedSender<NetworkEvent>>,
    begin: Instant,
}

impl EventEmitter {
    pub fn new_disabled() -> Self {
        Self {
            sender: None,
            begin: Instant::now(),
        }
    }

    pub fn new_enabled() -> (Self, EventCollector) {
        let (tx, rx) = mpsc::unbounded_channel();
        let emitter = Self {
            sender: Some(tx),
            begin: Instant::now(),
        };
        (emitter, EventCollector::new(rx))
    }

    pub fn emit(&self, event: NetworkEvent) {
        if let Some(ref tx) = self.sender {
            let _ = tx.send(event);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Offset of `at` from the start of the measurement.
    pub fn offset(&self, at: Instant) -> Duration {
        at.saturating_duration_since(self.begin)
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new_disabled()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
