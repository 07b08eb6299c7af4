use ferrous_probe_domain::NetworkEvent;
use tokio::sync::mpsc;

/// Receiving half of the event channel. Owns every event emitted during one
/// measurement.
pub struct EventCollector {
    receiver: mpsc::UnboundedReceiver<NetworkEvent>,
}

impl EventCollector {
    pub(super) fn new(receiver: mpsc::UnboundedReceiver<NetworkEvent>) -> Self {
        Self { receiver }
    }

    /// Events emitted so far, in arrival order. Never blocks.
    pub fn drain(&mut self) -> Vec<NetworkEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Waits for the next event; `None` once every emitter is dropped.
    pub async fn recv(&mut self) -> Option<NetworkEvent> {
        self.receiver.recv().await
    }
}
