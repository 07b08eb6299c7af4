use crate::analysis::analyze_test_keys;
use ferrous_probe_domain::{TestKeys, Verdict};
use tracing::info;

pub struct AnalyzeMeasurementUseCase;

impl AnalyzeMeasurementUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, raw_url: &str, test_keys: &mut TestKeys) -> Verdict {
        let verdict = analyze_test_keys(raw_url, test_keys).clone();
        info!(
            url = %raw_url,
            dns_consistency = %verdict.dns_consistency,
            blocking = ?verdict.blocking,
            "Analysis complete"
        );
        verdict
    }
}

impl Default for AnalyzeMeasurementUseCase {
    fn default() -> Self {
        Self::new()
    }
}
