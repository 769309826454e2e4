//! Replay record data model for the Mockwire corpus generator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the typed records that make up a replay file — sessions, protocol
//! layer stacks, transactions, ordered header lists — plus the HTTP
//! status-code reason-phrase table.
//!
//! The serde representation of every type here matches the replay file
//! layout consumed by the proxy test harness: kebab-case record keys
//! (`client-request`, `connection-time`), protocol layers tagged by a
//! `name` field, and header fields as ordered `[name, value]` pairs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod model;
pub mod status;

pub use model::{
    ClientRequest, Content, FieldValue, Headers, HttpVersion, IpVersion, Layer, Meta,
    ProxyResponse, ReplayFile, ServerResponse, Session, TlsVersion, Transaction,
};
pub use status::reason_phrase;

/// Format version stamped into every replay file's `meta` block.
pub const FORMAT_VERSION: &str = "1.0";
