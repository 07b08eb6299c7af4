//! Reduction of the raw event stream into archival test-key records.

use crate::dns::message::{message_id, question_of, rcode_failure, ResponseParser};
use ferrous_probe_application::ports::AsnLookup;
use ferrous_probe_domain::dns_protocol::split_host_port;
use ferrous_probe_domain::{
    ConnectEvent, DnsAnswerEntry, DnsQueryEntry, DnsRoundTripEvent, FailureKind, GetterTestKeys,
    NetworkEvent, TcpConnectEntry, TcpConnectStatus, TlsHandshakeEntry, TlsHandshakeEvent,
};

/// Folds events into query, TCP connect and TLS handshake records, in event
/// order. UDP connects are not archived.
pub fn archive_events(events: &[NetworkEvent], asn: &dyn AsnLookup) -> GetterTestKeys {
    let mut keys = GetterTestKeys::default();
    for event in events {
        match event {
            NetworkEvent::Connect(ev) => {
                if let Some(entry) = tcp_connect_entry(ev) {
                    keys.tcp_connect.push(entry);
                }
            }
            NetworkEvent::TlsHandshake(ev) => keys.tls_handshakes.push(tls_handshake_entry(ev)),
            NetworkEvent::DnsRoundTrip(ev) => {
                if let Some(entry) = dns_query_entry(ev, asn) {
                    keys.queries.push(entry);
                }
            }
        }
    }
    keys
}

pub fn tcp_connect_entry(ev: &ConnectEvent) -> Option<TcpConnectEntry> {
    if ev.network != "tcp" {
        return None;
    }
    let (ip, port) = split_host_port(&ev.address)?;
    Some(TcpConnectEntry {
        ip: ip.to_string(),
        port,
        status: TcpConnectStatus {
            success: ev.failure.is_none(),
            failure: ev.failure.clone(),
        },
        t: ev.started.as_secs_f64(),
    })
}

pub fn tls_handshake_entry(ev: &TlsHandshakeEvent) -> TlsHandshakeEntry {
    TlsHandshakeEntry {
        address: ev.address.clone(),
        server_name: ev.server_name.clone(),
        tls_version: ev.tls_version.clone(),
        cipher_suite: ev.cipher_suite.clone(),
        negotiated_protocol: ev.negotiated_protocol.clone(),
        failure: ev.failure.clone(),
        t: ev.started.as_secs_f64(),
    }
}

/// Rebuilds a query record from the raw bytes of a round trip.
///
/// Returns `None` when the query bytes carry no readable question.
pub fn dns_query_entry(ev: &DnsRoundTripEvent, asn: &dyn AsnLookup) -> Option<DnsQueryEntry> {
    let (hostname, query_type) = question_of(&ev.query)?;
    let mut entry = DnsQueryEntry {
        hostname,
        query_type,
        failure: ev.failure.clone(),
        engine: ev.network.clone(),
        resolver_address: ev.address.clone(),
        t: ev.started.as_secs_f64(),
        ..Default::default()
    };

    let Some(reply) = ev.reply.as_deref() else {
        return Some(entry);
    };
    if message_id(reply) != message_id(&ev.query) {
        entry.failure = Some(FailureKind::DnsMalformedResponse.to_string());
        return Some(entry);
    }
    match ResponseParser::parse(reply) {
        Ok(parsed) => {
            if let Some(kind) = rcode_failure(parsed.rcode) {
                entry.failure = Some(kind.to_string());
            }
            entry.answers = parsed
                .answers
                .iter()
                .map(|(ip, ttl)| {
                    let info = asn.lookup(*ip);
                    let mut answer = DnsAnswerEntry::from_ip(*ip, info.asn, Some(*ttl));
                    answer.as_org_name = info.org_name;
                    answer
                })
                .collect();
        }
        Err(e) => entry.failure = Some(e.failure()),
    }
    Some(entry)
}
