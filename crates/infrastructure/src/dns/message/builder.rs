//! DNS Query Builder
//!
//! Encodes the A/AAAA questions the serial resolver sends, optionally padded
//! with an EDNS(0) padding option for encrypted transports.

use ferrous_probe_domain::ProbeError;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// Encrypted queries are padded to a multiple of this many bytes (RFC 8467).
pub const PADDING_BLOCK_SIZE: usize = 128;

const OPT_RR_TYPE: u16 = 41;
const PADDING_OPTION_CODE: u16 = 12;
const EDNS_UDP_PAYLOAD: u16 = 4096;
/// Root name, type, class, TTL and RDLENGTH of the OPT record, plus the
/// padding option's code and length.
const PADDING_OVERHEAD: usize = 11 + 4;

/// Builds recursive single-question queries with a random ID.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Build a DNS query and serialize it to wire format bytes
    ///
    /// Creates a standard recursive query with:
    /// - Random ID for request/response matching
    /// - RD (Recursion Desired) flag set
    /// - Single IN-class question
    /// - An OPT record with padding when `pad` is set
    ///
    /// # Arguments
    /// * `hostname` - Name to query, already in ASCII form (e.g., "example.com")
    /// * `query_type` - Record type to ask for (A or AAAA)
    /// * `pad` - Whether to pad the message to a multiple of [`PADDING_BLOCK_SIZE`]
    ///
    /// # Returns
    /// Serialized DNS message bytes ready for any transport's `round_trip`
    pub fn build(hostname: &str, query_type: RecordType, pad: bool) -> Result<Vec<u8>, ProbeError> {
        let name = Name::from_str(hostname).map_err(|e| {
            ProbeError::InvalidDomainName(format!("Invalid domain '{}': {}", hostname, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(query_type);
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.metadata.recursion_desired = true;
        message.add_query(query);

        let mut buf = Vec::with_capacity(PADDING_BLOCK_SIZE);
        let mut encoder = BinEncoder::new(&mut buf);
        message.emit(&mut encoder).map_err(|e| {
            ProbeError::InvalidDomainName(format!("Failed to serialize query for '{}': {}", hostname, e))
        })?;

        if pad {
            Self::pad(&mut buf);
        }
        Ok(buf)
    }

    /// Appends an OPT record carrying an EDNS(0) padding option so the
    /// message length becomes a multiple of [`PADDING_BLOCK_SIZE`].
    fn pad(buf: &mut Vec<u8>) {
        let unpadded = buf.len() + PADDING_OVERHEAD;
        let padding = (PADDING_BLOCK_SIZE - unpadded % PADDING_BLOCK_SIZE) % PADDING_BLOCK_SIZE;

        buf.push(0);
        buf.extend_from_slice(&OPT_RR_TYPE.to_be_bytes());
        buf.extend_from_slice(&EDNS_UDP_PAYLOAD.to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes());
        buf.extend_from_slice(&((4 + padding) as u16).to_be_bytes());
        buf.extend_from_slice(&PADDING_OPTION_CODE.to_be_bytes());
        buf.extend_from_slice(&(padding as u16).to_be_bytes());
        buf.resize(buf.len() + padding, 0);

        let arcount = u16::from_be_bytes([buf[10], buf[11]]).saturating_add(1);
        buf[10..12].copy_from_slice(&arcount.to_be_bytes());
    }
}
