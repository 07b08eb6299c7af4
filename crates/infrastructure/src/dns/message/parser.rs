//! DNS Response Parser
//!
//! Decodes replies into the address answers the resolver archives, plus the
//! header fields it needs to classify failures.

use ferrous_probe_domain::{FailureKind, ProbeError};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{RData, RecordType};
use std::net::IpAddr;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub rcode: ResponseCode,
    pub truncated: bool,
    /// A and AAAA answers with their TTLs, in wire order.
    pub answers: Vec<(IpAddr, u32)>,
}

impl ParsedResponse {
    pub fn addresses(&self) -> impl Iterator<Item = IpAddr> + '_ {
        self.answers.iter().map(|(ip, _)| *ip)
    }
}

/// Parses DNS responses from wire format
pub struct ResponseParser;

impl ResponseParser {
    /// Parse raw DNS response bytes
    ///
    /// Extracts A and AAAA answers with their TTLs; other record types are
    /// skipped. The response code is returned as-is, see [`rcode_failure`].
    ///
    /// # Arguments
    /// * `response_bytes` - Raw reply as returned by a transport
    ///
    /// # Returns
    /// The parsed response, or `dns_malformed_response` when the bytes do not
    /// decode as a DNS message
    pub fn parse(response_bytes: &[u8]) -> Result<ParsedResponse, ProbeError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            debug!(error = %e, "Failed to parse DNS response");
            ProbeError::Resolution {
                hostname: question_of(response_bytes)
                    .map(|(hostname, _)| hostname)
                    .unwrap_or_default(),
                kind: FailureKind::DnsMalformedResponse,
            }
        })?;

        let mut answers = Vec::new();
        for record in &message.answers {
            match &record.data {
                RData::A(a) => answers.push((IpAddr::V4(a.0), record.ttl)),
                RData::AAAA(aaaa) => answers.push((IpAddr::V6(aaaa.0), record.ttl)),
                _ => {}
            }
        }

        let parsed = ParsedResponse {
            rcode: message.metadata.response_code,
            truncated: message.metadata.truncation,
            answers,
        };
        debug!(
            rcode = ?parsed.rcode,
            addresses = parsed.answers.len(),
            truncated = parsed.truncated,
            "DNS response parsed"
        );
        Ok(parsed)
    }
}

/// Failure implied by a response code, `None` for NOERROR.
pub fn rcode_failure(rcode: ResponseCode) -> Option<FailureKind> {
    match rcode {
        ResponseCode::NoError => None,
        ResponseCode::NXDomain => Some(FailureKind::DnsNxdomain),
        ResponseCode::Refused => Some(FailureKind::DnsRefused),
        _ => Some(FailureKind::DnsServerFailure),
    }
}

pub fn message_id(bytes: &[u8]) -> Option<u16> {
    Some(u16::from_be_bytes([*bytes.first()?, *bytes.get(1)?]))
}

/// Reads the first question of a wire message as `(hostname, query type)`.
///
/// Only uncompressed names are accepted, which is what queries carry.
pub fn question_of(bytes: &[u8]) -> Option<(String, String)> {
    let qdcount = u16::from_be_bytes([*bytes.get(4)?, *bytes.get(5)?]);
    if qdcount == 0 {
        return None;
    }

    let mut labels = Vec::new();
    let mut pos = 12;
    loop {
        let len = *bytes.get(pos)? as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        if len & 0xC0 != 0 {
            return None;
        }
        let label = bytes.get(pos..pos + len)?;
        labels.push(String::from_utf8_lossy(label).into_owned());
        pos += len;
    }

    let qtype = u16::from_be_bytes([*bytes.get(pos)?, *bytes.get(pos + 1)?]);
    Some((labels.join("."), RecordType::from(qtype).to_string()))
}
