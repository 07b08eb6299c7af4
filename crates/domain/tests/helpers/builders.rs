#![allow(dead_code)]
use ferrous_probe_domain::{
    DnsAnswerEntry, DnsQueryEntry, HttpRequestEntry, HttpResponse, TcpConnectEntry,
    TcpConnectStatus,
};
use std::net::IpAddr;

pub struct DnsQueryBuilder {
    hostname: String,
    query_type: String,
    answers: Vec<DnsAnswerEntry>,
    failure: Option<String>,
}

impl DnsQueryBuilder {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            query_type: "A".to_string(),
            answers: Vec::new(),
            failure: None,
        }
    }

    pub fn query_type(mut self, query_type: &str) -> Self {
        self.query_type = query_type.to_string();
        self
    }

    pub fn answer(mut self, ip: &str, asn: i64) -> Self {
        let ip: IpAddr = ip.parse().unwrap();
        self.answers.push(DnsAnswerEntry::from_ip(ip, asn, Some(300)));
        self
    }

    pub fn failure(mut self, failure: &str) -> Self {
        self.failure = Some(failure.to_string());
        self
    }

    pub fn build(self) -> DnsQueryEntry {
        DnsQueryEntry {
            hostname: self.hostname,
            query_type: self.query_type,
            answers: self.answers,
            failure: self.failure,
            engine: "udp".to_string(),
            resolver_address: "8.8.8.8:53".to_string(),
            t: 0.0,
        }
    }
}

pub fn tcp_connect(ip: &str, port: u16, failure: Option<&str>) -> TcpConnectEntry {
    TcpConnectEntry {
        ip: ip.to_string(),
        port,
        status: TcpConnectStatus {
            success: failure.is_none(),
            failure: failure.map(str::to_string),
        },
        t: 0.0,
    }
}

pub fn http_request(url: &str, code: i64, body_length: i64, title: &str) -> HttpRequestEntry {
    HttpRequestEntry {
        url: url.to_string(),
        failure: None,
        response: HttpResponse {
            code,
            body_length,
            title: title.to_string(),
            ..Default::default()
        },
    }
}
