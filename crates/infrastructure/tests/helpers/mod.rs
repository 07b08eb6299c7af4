#![allow(dead_code)]
pub mod builders;
pub mod dns_server_mock;
pub mod doh_server_mock;
pub mod fake_transport;
pub mod tls_server_mock;

pub use builders::*;
pub use dns_server_mock::*;
pub use doh_server_mock::*;
pub use fake_transport::*;
pub use tls_server_mock::*;
