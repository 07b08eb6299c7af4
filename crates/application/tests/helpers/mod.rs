#![allow(dead_code)]
mod mock_resolver;
mod test_keys_builder;

pub use mock_resolver::MockResolver;
pub use test_keys_builder::TestKeysBuilder;
