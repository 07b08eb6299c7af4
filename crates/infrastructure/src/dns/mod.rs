pub mod message;
pub mod resolver;
pub mod transport;

pub use resolver::{new_resolver, IdnaResolver, LoggingResolver, SerialResolver, SystemResolver};
pub use transport::{new_transport, DnsTransport, TransportOptions};
