use ferrous_probe_domain::{CliOverrides, ProbeConfig};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<ProbeConfig> {
    ProbeConfig::load(path, overrides)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
