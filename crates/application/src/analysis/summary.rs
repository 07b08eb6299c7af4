use ferrous_probe_domain::{Blocking, DnsConsistency, FailureKind, TestKeys, Verdict};

/// Fills `accessible` and `blocking` from the already computed comparison
/// fields of `verdict`.
///
/// Rules are checked in order and the first one that applies wins. Leaving
/// both fields `None` means the measurement cannot be classified.
pub fn summarize(tk: &TestKeys, verdict: &mut Verdict) {
    let dns = verdict.dns_consistency;
    let final_request = tk.getter.requests.first();
    let http_failure = tk
        .http_experiment_failure
        .as_deref()
        .or_else(|| final_request.and_then(|r| r.failure.as_deref()));

    // A successful HTTPS fetch means the certificate validated for the host.
    if let Some(request) = final_request {
        if request.url.starts_with("https://")
            && http_failure.is_none()
            && dns == DnsConsistency::Consistent
        {
            mark_accessible(verdict);
            return;
        }
    }

    if tk.control_failure.is_some() {
        return;
    }

    if tk.dns_experiment_failure.as_deref() == Some(FailureKind::NXDOMAIN) {
        if dns == DnsConsistency::Consistent {
            // The domain is gone for the control too.
            verdict.accessible = Some(false);
            verdict.blocking = Some(Blocking::NotBlocked);
        } else {
            mark_blocked(verdict, Blocking::Dns);
        }
        return;
    }

    if tk.getter.tcp_connect_attempts() > 0 && tk.getter.tcp_connect_successes() == 0 {
        match dns {
            DnsConsistency::Consistent => {
                mark_blocked(verdict, Blocking::TcpIp);
                return;
            }
            DnsConsistency::Inconsistent => {
                mark_blocked(verdict, Blocking::Dns);
                return;
            }
            DnsConsistency::Unknown => {}
        }
    }

    if tk.control.http_request.failure.is_some()
        || !control_has_http_facts(tk)
        || final_request.is_none()
    {
        return;
    }

    if http_failure.is_some() {
        let blocking = if dns == DnsConsistency::Inconsistent {
            Blocking::Dns
        } else {
            Blocking::HttpFailure
        };
        mark_blocked(verdict, blocking);
        return;
    }

    let page_matches = verdict.body_length_match == Some(true)
        || verdict.headers_match == Some(true)
        || verdict.title_match == Some(true);
    if verdict.status_code_match == Some(true)
        && page_matches
        && dns == DnsConsistency::Consistent
    {
        mark_accessible(verdict);
        return;
    }

    if dns == DnsConsistency::Inconsistent {
        mark_blocked(verdict, Blocking::Dns);
        return;
    }

    mark_blocked(verdict, Blocking::HttpDiff);
}

/// A zero-valued control request means the control never fetched the page.
fn control_has_http_facts(tk: &TestKeys) -> bool {
    let control = &tk.control.http_request;
    control.status_code > 0
        || control.body_length > 0
        || !control.headers.is_empty()
        || !control.title.is_empty()
}

fn mark_accessible(verdict: &mut Verdict) {
    verdict.accessible = Some(true);
    verdict.blocking = Some(Blocking::NotBlocked);
}

fn mark_blocked(verdict: &mut Verdict, blocking: Blocking) {
    verdict.accessible = Some(false);
    verdict.blocking = Some(blocking);
}
