use ferrous_probe_domain::{
    ControlResponse, DnsAnswerEntry, DnsQueryEntry, HttpRequestEntry, HttpResponse, TcpConnectEntry,
    TcpConnectStatus, TestKeys,
};
use std::collections::BTreeMap;

/// Builds a measurement whose DNS and HTTP facts agree with the control
/// unless told otherwise.
pub struct TestKeysBuilder {
    tk: TestKeys,
}

impl TestKeysBuilder {
    pub fn new(hostname: &str) -> Self {
        let mut tk = TestKeys::default();
        tk.getter.queries.push(DnsQueryEntry {
            hostname: hostname.to_string(),
            query_type: "A".to_string(),
            answers: vec![DnsAnswerEntry::from_ip(
                "93.184.216.34".parse().unwrap(),
                15133,
                Some(300),
            )],
            ..Default::default()
        });
        tk.control.dns.addrs = vec!["93.184.216.34".to_string()];
        tk.control.dns.asns = vec![15133];
        tk.control.http_request.status_code = 200;
        tk.control.http_request.body_length = 1256;
        tk.control.http_request.title = "Example Domain".to_string();
        tk.control.http_request.headers = headers(&["Date", "Server", "X-Cache"]);
        Self { tk }
    }

    pub fn http_response(mut self, url: &str, code: i64, body_length: i64, title: &str) -> Self {
        self.tk.getter.requests = vec![HttpRequestEntry {
            url: url.to_string(),
            failure: None,
            response: HttpResponse {
                code,
                body_length,
                title: title.to_string(),
                headers: headers(&["Date", "Server", "X-Cache"]),
                body_is_truncated: false,
            },
        }];
        self
    }

    pub fn http_failure(mut self, url: &str, failure: &str) -> Self {
        self.tk.getter.requests = vec![HttpRequestEntry {
            url: url.to_string(),
            failure: Some(failure.to_string()),
            response: HttpResponse::default(),
        }];
        self.tk.http_experiment_failure = Some(failure.to_string());
        self
    }

    pub fn tcp_connect(mut self, ip: &str, failure: Option<&str>) -> Self {
        self.tk.getter.tcp_connect.push(TcpConnectEntry {
            ip: ip.to_string(),
            port: 80,
            status: TcpConnectStatus {
                success: failure.is_none(),
                failure: failure.map(str::to_string),
            },
            t: 0.0,
        });
        self
    }

    pub fn dns_failure(mut self, failure: &str) -> Self {
        self.tk.getter.queries[0].answers.clear();
        self.tk.getter.queries[0].failure = Some(failure.to_string());
        self.tk.dns_experiment_failure = Some(failure.to_string());
        self
    }

    pub fn measured_answer(mut self, ip: &str, asn: i64) -> Self {
        self.tk.getter.queries[0].answers =
            vec![DnsAnswerEntry::from_ip(ip.parse().unwrap(), asn, None)];
        self
    }

    pub fn control_dns_failure(mut self, failure: &str) -> Self {
        self.tk.control.dns.failure = Some(failure.to_string());
        self.tk.control.dns.addrs.clear();
        self.tk.control.dns.asns.clear();
        self
    }

    pub fn control_http_failure(mut self, failure: &str) -> Self {
        self.tk.control.http_request.failure = Some(failure.to_string());
        self
    }

    /// Drops everything the control reported, as when it never answered.
    pub fn without_control(mut self) -> Self {
        self.tk.control = ControlResponse::default();
        self
    }

    pub fn control_failure(mut self, failure: &str) -> Self {
        self.tk.control_failure = Some(failure.to_string());
        self
    }

    pub fn build(self) -> TestKeys {
        self.tk
    }
}

fn headers(names: &[&str]) -> BTreeMap<String, String> {
    names
        .iter()
        .map(|n| (n.to_string(), "value".to_string()))
        .collect()
}
