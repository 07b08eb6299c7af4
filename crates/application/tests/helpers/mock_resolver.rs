use async_trait::async_trait;
use ferrous_probe_application::ports::Resolver;
use ferrous_probe_domain::{FailureKind, ProbeError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

pub struct MockResolver {
    responses: RwLock<HashMap<String, Vec<String>>>,
    calls: AtomicUsize,
    last_hostname: RwLock<Option<String>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            last_hostname: RwLock::new(None),
        }
    }

    pub fn set_response(&self, hostname: &str, addrs: &[&str]) {
        self.responses.write().unwrap().insert(
            hostname.to_string(),
            addrs.iter().map(|a| a.to_string()).collect(),
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_hostname(&self) -> Option<String> {
        self.last_hostname.read().unwrap().clone()
    }
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Resolver for MockResolver {
    async fn lookup_host(&self, hostname: &str) -> Result<Vec<String>, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_hostname.write().unwrap() = Some(hostname.to_string());
        self.responses
            .read()
            .unwrap()
            .get(hostname)
            .cloned()
            .ok_or_else(|| ProbeError::Resolution {
                hostname: hostname.to_string(),
                kind: FailureKind::DnsNxdomain,
            })
    }

    fn network(&self) -> &str {
        "mock"
    }

    fn address(&self) -> &str {
        ""
    }
}
