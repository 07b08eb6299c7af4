use anyhow::Context;
use ferrous_probe_application::use_cases::AnalyzeMeasurementUseCase;
use ferrous_probe_domain::TestKeys;
use serde_json::Value;
use std::path::Path;

pub fn analyze(url: &str, file: &Path) -> anyhow::Result<Value> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut test_keys: TestKeys = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse test keys in {}", file.display()))?;

    let verdict = AnalyzeMeasurementUseCase::new().execute(url, &mut test_keys);
    Ok(serde_json::to_value(verdict)?)
}
