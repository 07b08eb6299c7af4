//! Ferrous Probe Infrastructure Layer
pub mod archival;
pub mod asn;
pub mod dialer;
pub mod dns;
pub mod events;
