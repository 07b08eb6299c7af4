mod asn_lookup;
mod resolver;

pub use asn_lookup::{AsnInfo, AsnLookup};
pub use resolver::Resolver;
