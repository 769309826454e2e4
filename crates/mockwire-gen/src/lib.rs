//! Generation core for the Mockwire replay corpus generator.
//!
//! Produces statistically varied but protocol-consistent replay records:
//! the partitioner splits an exact global transaction budget across files
//! and sessions under randomized bounds, and the selector/synthesizer pair
//! picks a mutually compatible protocol combination per session and fills
//! in each transaction's fields accordingly.
//!
//! # Architecture
//!
//! - [`CorpusPartitioner`] drives generation, yielding one file per call
//! - [`build_session`] assembles one session (protocol stack + transactions)
//! - [`select_protocol`] picks a consistent (URL, TLS, HTTP, IP) combination
//! - [`synthesize_transaction`] fills one request/response exchange
//!
//! Every random decision draws from a caller-supplied [`rand::Rng`], so a
//! seeded RNG makes whole-corpus generation deterministic. The crate does
//! no I/O; serialization belongs to the caller.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod partition;
pub mod select;
pub mod session;
pub mod synth;
pub mod urls;

pub use config::{Bounds, GeneratorConfig, ProtocolSet};
pub use error::{ConfigError, SelectError};
pub use partition::{CorpusPartitioner, GeneratedFile};
pub use select::{select_protocol, ProtocolContext};
pub use session::build_session;
pub use synth::synthesize_transaction;
pub use urls::{ParsedUrl, UrlPool};
