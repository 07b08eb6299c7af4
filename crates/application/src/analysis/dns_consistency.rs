use ferrous_probe_domain::{
    DnsConsistency, DnsQueryEntry, TestKeys, ASN_UNKNOWN, CONTROL_DNS_NAME_ERROR,
};
use std::collections::HashSet;
use std::net::IpAddr;
use url::{Host, Url};

/// (control failure, measurement failure) pairs that describe the same
/// outcome. Any other pair where at least one side failed is inconsistent.
const COMPATIBLE_FAILURES: &[(&str, &str)] = &[(CONTROL_DNS_NAME_ERROR, "dns_nxdomain_error")];

/// Compares the measurement's DNS view with the control's.
///
/// Resolution order: literal IP host, failure comparison, ASN sets, then
/// address sets. Returns [`DnsConsistency::Unknown`] when one side has no
/// data to compare.
pub fn dns_consistency(url: &Url, tk: &TestKeys) -> DnsConsistency {
    if matches!(url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_))) {
        return DnsConsistency::Consistent;
    }

    let measurement_failure = tk.dns_experiment_failure.as_deref();
    let control_failure = tk.control.dns.failure.as_deref();
    if measurement_failure.is_some() || control_failure.is_some() {
        return match (control_failure, measurement_failure) {
            (Some(control), Some(measurement))
                if COMPATIBLE_FAILURES
                    .iter()
                    .any(|(c, m)| *c == control && *m == measurement) =>
            {
                DnsConsistency::Consistent
            }
            _ => DnsConsistency::Inconsistent,
        };
    }

    let queries = latest_lookup(&tk.getter.queries);

    let measured_asns: HashSet<i64> = queries
        .iter()
        .flat_map(|q| q.answers.iter())
        .filter(|a| a.has_known_asn())
        .map(|a| a.asn)
        .collect();
    let control_asns: HashSet<i64> = tk
        .control
        .dns
        .asns
        .iter()
        .copied()
        .filter(|asn| *asn != ASN_UNKNOWN)
        .collect();
    if !measured_asns.is_empty() && !control_asns.is_empty() {
        return if measured_asns.is_disjoint(&control_asns) {
            DnsConsistency::Inconsistent
        } else {
            DnsConsistency::Consistent
        };
    }

    let measured_addrs: HashSet<AddrKey> = queries
        .iter()
        .flat_map(|q| q.addresses())
        .map(AddrKey::new)
        .collect();
    let control_addrs: HashSet<AddrKey> = tk
        .control
        .dns
        .addrs
        .iter()
        .map(|a| AddrKey::new(a))
        .collect();
    if measured_addrs.is_empty() || control_addrs.is_empty() {
        return DnsConsistency::Unknown;
    }
    if measured_addrs.is_disjoint(&control_addrs) {
        DnsConsistency::Inconsistent
    } else {
        DnsConsistency::Consistent
    }
}

/// Entries produced by the most recent lookup: the trailing run of queries
/// sharing the last entry's hostname (one per query type).
fn latest_lookup(queries: &[DnsQueryEntry]) -> &[DnsQueryEntry] {
    let Some(last) = queries.last() else {
        return queries;
    };
    let start = queries
        .iter()
        .rposition(|q| q.hostname != last.hostname)
        .map_or(0, |pos| pos + 1);
    &queries[start..]
}

/// Address compared by value when it parses, so `2001:db8::1` and
/// `2001:0db8::1` are the same answer.
#[derive(Debug, PartialEq, Eq, Hash)]
enum AddrKey {
    Ip(IpAddr),
    Raw(String),
}

impl AddrKey {
    fn new(addr: &str) -> Self {
        addr.parse()
            .map(AddrKey::Ip)
            .unwrap_or_else(|_| AddrKey::Raw(addr.to_string()))
    }
}
