use crate::dns::message::{message_id, rcode_failure, QueryBuilder, ResponseParser};
use crate::dns::transport::DnsTransport;
use crate::events::EventEmitter;
use async_trait::async_trait;
use ferrous_probe_application::ports::{AsnLookup, Resolver};
use ferrous_probe_domain::{DnsAnswerEntry, DnsQueryEntry, FailureKind, ProbeError};
use hickory_proto::rr::RecordType;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

const QUERY_TYPES: [RecordType; 2] = [RecordType::A, RecordType::AAAA];

struct QueryOutcome {
    query_type: RecordType,
    started: Instant,
    result: Result<Vec<(IpAddr, u32)>, ProbeError>,
}

/// Resolver speaking the DNS wire protocol over a [`DnsTransport`].
///
/// Sends an A query, then an AAAA query, never in parallel. A lookup
/// succeeds when either query yields addresses.
pub struct SerialResolver {
    transport: Arc<dyn DnsTransport>,
    asn: Arc<dyn AsnLookup>,
    emitter: EventEmitter,
}

impl SerialResolver {
    pub fn new(transport: Arc<dyn DnsTransport>, asn: Arc<dyn AsnLookup>) -> Self {
        Self {
            transport,
            asn,
            emitter: EventEmitter::new_disabled(),
        }
    }

    /// Shares the measurement time base used for the `t` of query entries.
    pub fn with_emitter(mut self, emitter: EventEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    /// Resolves `hostname` and returns one archival entry per query type,
    /// answers annotated with their ASN.
    pub async fn lookup(&self, hostname: &str) -> Vec<DnsQueryEntry> {
        self.query_all(hostname)
            .await
            .into_iter()
            .map(|outcome| {
                let (answers, failure) = match outcome.result {
                    Ok(answers) => (
                        answers
                            .into_iter()
                            .map(|(ip, ttl)| self.answer_entry(ip, ttl))
                            .collect(),
                        None,
                    ),
                    Err(e) => (Vec::new(), Some(e.failure())),
                };
                DnsQueryEntry {
                    hostname: hostname.to_string(),
                    query_type: outcome.query_type.to_string(),
                    answers,
                    failure,
                    engine: self.transport.network().to_string(),
                    resolver_address: self.transport.address().to_string(),
                    t: self.emitter.offset(outcome.started).as_secs_f64(),
                }
            })
            .collect()
    }

    fn answer_entry(&self, ip: IpAddr, ttl: u32) -> DnsAnswerEntry {
        let info = self.asn.lookup(ip);
        let mut entry = DnsAnswerEntry::from_ip(ip, info.asn, Some(ttl));
        entry.as_org_name = info.org_name;
        entry
    }

    async fn query_all(&self, hostname: &str) -> Vec<QueryOutcome> {
        let mut outcomes = Vec::with_capacity(QUERY_TYPES.len());
        for query_type in QUERY_TYPES {
            let started = Instant::now();
            let result = self.query(hostname, query_type).await;
            outcomes.push(QueryOutcome {
                query_type,
                started,
                result,
            });
        }
        outcomes
    }

    async fn query(
        &self,
        hostname: &str,
        query_type: RecordType,
    ) -> Result<Vec<(IpAddr, u32)>, ProbeError> {
        let failed = |kind| ProbeError::Resolution {
            hostname: hostname.to_string(),
            kind,
        };

        let query = QueryBuilder::build(hostname, query_type, self.transport.requires_padding())?;
        let reply = self.transport.round_trip(&query).await?;

        if message_id(&reply) != message_id(&query) {
            debug!(hostname = hostname, query_type = %query_type, "Reply ID does not match query");
            return Err(failed(FailureKind::DnsMalformedResponse));
        }
        let parsed =
            ResponseParser::parse(&reply).map_err(|_| failed(FailureKind::DnsMalformedResponse))?;
        if let Some(kind) = rcode_failure(parsed.rcode) {
            return Err(failed(kind));
        }

        debug!(
            hostname = hostname,
            query_type = %query_type,
            answers = parsed.answers.len(),
            truncated = parsed.truncated,
            "Query answered"
        );
        Ok(parsed.answers)
    }
}

#[async_trait]
impl Resolver for SerialResolver {
    async fn lookup_host(&self, hostname: &str) -> Result<Vec<String>, ProbeError> {
        let mut addresses = Vec::new();
        let mut first_error = None;

        for outcome in self.query_all(hostname).await {
            match outcome.result {
                Ok(answers) => addresses.extend(answers.into_iter().map(|(ip, _)| ip.to_string())),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        if !addresses.is_empty() {
            return Ok(addresses);
        }
        Err(first_error.unwrap_or_else(|| ProbeError::Resolution {
            hostname: hostname.to_string(),
            kind: FailureKind::DnsNoAnswer,
        }))
    }

    fn network(&self) -> &str {
        self.transport.network()
    }

    fn address(&self) -> &str {
        self.transport.address()
    }
}
