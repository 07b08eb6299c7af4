//! Ferrous Probe Application Layer
pub mod analysis;
pub mod ports;
pub mod use_cases;
