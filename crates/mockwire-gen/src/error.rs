//! Error types for the generation core.
//!
//! Two families: configuration errors, all detectable before generation
//! starts, and selection errors surfaced at runtime when the URL pool
//! cannot satisfy a required scheme.

use std::error::Error;
use std::fmt;

/// Errors detected during [`GeneratorConfig::validate()`](crate::GeneratorConfig::validate)
/// or URL pool construction, before any generation begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A sampling range has `lower > upper`.
    InvalidBounds {
        /// Which range: `"session"` or `"transaction"`.
        what: &'static str,
        /// The configured lower bound.
        lower: u64,
        /// The configured upper bound.
        upper: u64,
    },
    /// A sampling range has an upper bound of zero, which could never
    /// make progress against the budget.
    ZeroUpperBound {
        /// Which range: `"session"` or `"transaction"`.
        what: &'static str,
    },
    /// The requested total transaction count is zero.
    ZeroTransactions,
    /// The URL pool contains no entries.
    EmptyUrlPool,
    /// A pool entry could not be parsed as a URL.
    InvalidUrl {
        /// The offending entry.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// No protocol family is enabled.
    NoProtocolsEnabled,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { what, lower, upper } => {
                write!(f, "invalid {what} bounds: lower {lower} > upper {upper}")
            }
            Self::ZeroUpperBound { what } => {
                write!(f, "{what} upper bound must be positive, or generation never finishes")
            }
            Self::ZeroTransactions => write!(f, "total transaction count must be positive"),
            Self::EmptyUrlPool => write!(f, "URL pool is empty"),
            Self::InvalidUrl { url, reason } => write!(f, "invalid URL '{url}': {reason}"),
            Self::NoProtocolsEnabled => {
                write!(f, "no protocol family enabled (need http, tls, or h2)")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors from protocol selection at generation time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectError {
    /// The pool has no URL with the scheme the enabled protocol set requires.
    NoMatchingUrl {
        /// Whether a secure (`https`) URL was required.
        secure: bool,
    },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatchingUrl { secure: true } => {
                write!(f, "URL pool contains no https URL, required by the enabled protocols")
            }
            Self::NoMatchingUrl { secure: false } => {
                write!(f, "URL pool contains no cleartext http URL, required by the enabled protocols")
            }
        }
    }
}

impl Error for SelectError {}
