use crate::archival::{DnsQueryEntry, HttpRequestEntry, TcpConnectEntry, TlsHandshakeEntry};
use crate::control::ControlResponse;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Result of fetching a URL: network events reduced to archival records,
/// plus the final HTTP outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetterTestKeys {
    #[serde(default)]
    pub queries: Vec<DnsQueryEntry>,
    #[serde(default)]
    pub tcp_connect: Vec<TcpConnectEntry>,
    #[serde(default)]
    pub tls_handshakes: Vec<TlsHandshakeEntry>,
    #[serde(default)]
    pub requests: Vec<HttpRequestEntry>,
    #[serde(default)]
    pub failure: Option<String>,
}

impl GetterTestKeys {
    pub fn tcp_connect_attempts(&self) -> usize {
        self.tcp_connect.len()
    }

    pub fn tcp_connect_successes(&self) -> usize {
        self.tcp_connect.iter().filter(|e| e.status.success).count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnsConsistency {
    #[default]
    #[serde(rename = "")]
    Unknown,
    #[serde(rename = "consistent")]
    Consistent,
    #[serde(rename = "inconsistent")]
    Inconsistent,
}

impl DnsConsistency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Consistent => "consistent",
            Self::Inconsistent => "inconsistent",
        }
    }
}

impl fmt::Display for DnsConsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a measurement is (or is not) considered blocked.
///
/// Serializes as `false` when not blocked and as the category string
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blocking {
    NotBlocked,
    Dns,
    TcpIp,
    HttpDiff,
    HttpFailure,
}

impl Blocking {
    pub fn category(&self) -> Option<&'static str> {
        match self {
            Self::NotBlocked => None,
            Self::Dns => Some("dns"),
            Self::TcpIp => Some("tcp_ip"),
            Self::HttpDiff => Some("http-diff"),
            Self::HttpFailure => Some("http-failure"),
        }
    }
}

impl Serialize for Blocking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.category() {
            None => serializer.serialize_bool(false),
            Some(category) => serializer.serialize_str(category),
        }
    }
}

impl<'de> Deserialize<'de> for Blocking {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Category(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(Blocking::NotBlocked),
            Raw::Flag(true) => Err(serde::de::Error::custom(
                "blocking must be false or a category string",
            )),
            Raw::Category(category) => match category.as_str() {
                "dns" => Ok(Blocking::Dns),
                "tcp_ip" => Ok(Blocking::TcpIp),
                "http-diff" => Ok(Blocking::HttpDiff),
                "http-failure" => Ok(Blocking::HttpFailure),
                other => Err(serde::de::Error::custom(format!(
                    "unknown blocking category '{}'",
                    other
                ))),
            },
        }
    }
}

/// Derived classification of one measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub dns_consistency: DnsConsistency,
    #[serde(default)]
    pub body_length_match: Option<bool>,
    #[serde(default)]
    pub headers_match: Option<bool>,
    #[serde(default)]
    pub status_code_match: Option<bool>,
    #[serde(default)]
    pub title_match: Option<bool>,
    #[serde(default)]
    pub accessible: Option<bool>,
    #[serde(default)]
    pub blocking: Option<Blocking>,
}

impl Verdict {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Web connectivity test keys: the getter result, the control's view, and
/// the verdict comparing the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestKeys {
    #[serde(flatten)]
    pub getter: GetterTestKeys,
    #[serde(default)]
    pub control: ControlResponse,
    #[serde(default)]
    pub control_failure: Option<String>,
    #[serde(default)]
    pub dns_experiment_failure: Option<String>,
    #[serde(default)]
    pub http_experiment_failure: Option<String>,
    #[serde(flatten)]
    verdict: Verdict,
    #[serde(skip)]
    verdict_recorded: bool,
}

impl TestKeys {
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    pub fn has_verdict(&self) -> bool {
        self.verdict_recorded || !self.verdict.is_empty()
    }

    /// Stores the verdict unless one was already recorded.
    ///
    /// Returns `false` and leaves the existing verdict untouched when called
    /// a second time.
    pub fn record_verdict(&mut self, verdict: Verdict) -> bool {
        if self.has_verdict() {
            return false;
        }
        self.verdict = verdict;
        self.verdict_recorded = true;
        true
    }

    /// URL of the final HTTP request, if any was made.
    pub fn http_request_url(&self) -> Option<&str> {
        self.getter.requests.first().map(|r| r.url.as_str())
    }
}
