//! Web connectivity analysis.
//!
//! Pure functions over a finished measurement. Nothing here performs I/O or
//! fails: missing data yields `None` or an unknown DNS consistency.

mod dns_consistency;
mod http_match;
mod summary;

pub use dns_consistency::dns_consistency;
pub use http_match::{
    body_length_match, headers_match, status_code_match, title_match,
    BODY_PROPORTION_THRESHOLD, MIN_TITLE_WORD_LEN,
};
pub use summary::summarize;

use ferrous_probe_domain::{TestKeys, Verdict};
use tracing::debug;
use url::Url;

/// Computes the verdict for the measurement of `raw_url`.
///
/// An unparseable URL or absent test keys yield an empty verdict.
pub fn analyze(raw_url: &str, tk: Option<&TestKeys>) -> Verdict {
    let (Ok(url), Some(tk)) = (Url::parse(raw_url), tk) else {
        debug!(url = %raw_url.escape_debug(), "Cannot classify measurement");
        return Verdict::default();
    };

    let mut verdict = Verdict {
        dns_consistency: dns_consistency(&url, tk),
        body_length_match: body_length_match(tk),
        headers_match: headers_match(tk),
        status_code_match: status_code_match(tk),
        title_match: title_match(tk),
        accessible: None,
        blocking: None,
    };
    summarize(tk, &mut verdict);

    debug!(
        url = %url,
        dns_consistency = %verdict.dns_consistency,
        accessible = ?verdict.accessible,
        blocking = ?verdict.blocking,
        "Measurement analyzed"
    );
    verdict
}

/// Analyzes `tk` and stores the result in it, unless a verdict is already
/// recorded. Returns the verdict held by `tk` afterwards.
pub fn analyze_test_keys<'a>(raw_url: &str, tk: &'a mut TestKeys) -> &'a Verdict {
    if !tk.has_verdict() {
        let verdict = analyze(raw_url, Some(tk));
        tk.record_verdict(verdict);
    }
    tk.verdict()
}

/// Lets a measurement classify itself: `tk.analyze(url)`.
pub trait AnalyzeTestKeys {
    fn analyze(&mut self, raw_url: &str) -> &Verdict;
}

impl AnalyzeTestKeys for TestKeys {
    fn analyze(&mut self, raw_url: &str) -> &Verdict {
        analyze_test_keys(raw_url, self)
    }
}
