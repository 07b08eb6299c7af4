pub mod dial;
pub mod errors;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod shaping;

pub use dial::DialConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, ProbeConfig};
pub use shaping::ShapingConfig;
