//! Wire-format DNS messages for the serial resolver.

mod builder;
mod parser;

pub use builder::{QueryBuilder, PADDING_BLOCK_SIZE};
pub use parser::{message_id, question_of, rcode_failure, ParsedResponse, ResponseParser};
