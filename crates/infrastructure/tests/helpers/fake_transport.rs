#![allow(dead_code)]
use super::dns_server_mock::MockBehavior;
use async_trait::async_trait;
use ferrous_probe_domain::{FailureKind, ProbeError};
use ferrous_probe_infrastructure::dns::DnsTransport;
use std::collections::VecDeque;
use std::sync::Mutex;

/// In-memory transport replaying scripted outcomes, one per round trip.
/// Once the script runs out the last entry repeats.
pub struct FakeTransport {
    script: Mutex<VecDeque<Result<MockBehavior, FailureKind>>>,
    last: Mutex<Option<Result<MockBehavior, FailureKind>>>,
    queries: Mutex<Vec<Vec<u8>>>,
    padding: bool,
}

impl FakeTransport {
    pub fn new(script: Vec<Result<MockBehavior, FailureKind>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
            padding: false,
        }
    }

    pub fn answering(behavior: MockBehavior) -> Self {
        Self::new(vec![Ok(behavior)])
    }

    pub fn with_padding(mut self) -> Self {
        self.padding = true;
        self
    }

    pub fn queries(&self) -> Vec<Vec<u8>> {
        self.queries.lock().unwrap().clone()
    }

    fn next_step(&self) -> Result<MockBehavior, FailureKind> {
        let mut last = self.last.lock().unwrap();
        if let Some(step) = self.script.lock().unwrap().pop_front() {
            *last = Some(step);
        }
        (*last)
            .clone()
            .unwrap_or(Err(FailureKind::Other("empty script".to_string())))
    }
}

#[async_trait]
impl DnsTransport for FakeTransport {
    async fn round_trip(&self, query: &[u8]) -> Result<Vec<u8>, ProbeError> {
        self.queries.lock().unwrap().push(query.to_vec());
        let transport_error = |kind| ProbeError::Transport {
            network: "fake",
            address: "fake:53".to_string(),
            kind,
            elapsed: std::time::Duration::ZERO,
        };
        match self.next_step() {
            Ok(behavior) => behavior
                .respond(query)
                .ok_or_else(|| transport_error(FailureKind::Timeout)),
            Err(kind) => Err(transport_error(kind)),
        }
    }

    fn requires_padding(&self) -> bool {
        self.padding
    }

    fn network(&self) -> &'static str {
        "fake"
    }

    fn address(&self) -> &str {
        "fake:53"
    }
}
