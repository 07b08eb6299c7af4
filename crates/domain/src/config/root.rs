use serde::{Deserialize, Serialize};

use super::dial::DialConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use super::shaping::ShapingConfig;

/// Main configuration structure for the probe
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProbeConfig {
    #[serde(default)]
    pub dial: DialConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub shaping: ShapingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProbeConfig {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-probe.toml in current directory
    /// 3. /etc/ferrous-probe/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(endpoint) = overrides.resolver {
            self.resolver.endpoint = endpoint;
        }
        if let Some(ms) = overrides.query_timeout_ms {
            self.resolver.query_timeout_ms = ms;
        }
        if let Some(ms) = overrides.connect_timeout_ms {
            self.dial.connect_timeout_ms = ms;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dial.connect_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "connect_timeout_ms cannot be 0".to_string(),
            ));
        }
        if self.dial.tls_handshake_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "tls_handshake_timeout_ms cannot be 0".to_string(),
            ));
        }
        if self.resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "query_timeout_ms cannot be 0".to_string(),
            ));
        }
        self.resolver.protocol()?;
        Ok(())
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("ferrous-probe.toml").exists() {
            Some("ferrous-probe.toml".to_string())
        } else if std::path::Path::new("/etc/ferrous-probe/config.toml").exists() {
            Some("/etc/ferrous-probe/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub resolver: Option<String>,
    pub query_timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
}
