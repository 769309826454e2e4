//! Generator configuration and upfront validation.
//!
//! [`GeneratorConfig`] is the input for constructing a
//! [`CorpusPartitioner`](crate::CorpusPartitioner);
//! [`validate()`](GeneratorConfig::validate) checks the structural
//! invariants before generation starts, so contradictory bounds fail with
//! a diagnostic instead of mid-stream.

use rand::Rng;

use crate::error::ConfigError;

// ── Bounds ──────────────────────────────────────────────────────

/// An inclusive sampling range `[lower, upper]`.
///
/// # Examples
///
/// ```
/// use mockwire_gen::Bounds;
///
/// let b = Bounds::new(3, 7);
/// assert!(b.validate("transaction").is_ok());
/// assert!(Bounds::new(7, 3).validate("transaction").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    /// Inclusive lower bound.
    pub lower: u64,
    /// Inclusive upper bound.
    pub upper: u64,
}

impl Bounds {
    /// Create a range. Not validated here; see [`validate`](Self::validate).
    pub fn new(lower: u64, upper: u64) -> Self {
        Self { lower, upper }
    }

    /// Fail with [`ConfigError::InvalidBounds`] when `lower > upper`.
    pub fn validate(&self, what: &'static str) -> Result<(), ConfigError> {
        if self.lower > self.upper {
            return Err(ConfigError::InvalidBounds {
                what,
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }

    /// Draw uniformly from the inclusive range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.random_range(self.lower..=self.upper)
    }
}

impl Default for Bounds {
    /// The tool's historical default of exactly 10 per unit.
    fn default() -> Self {
        Self::new(10, 10)
    }
}

// ── ProtocolSet ─────────────────────────────────────────────────

/// Which protocol families generated sessions may use.
///
/// The three flags are independent; the selection policy in
/// [`select_protocol`](crate::select_protocol) maps each combination to
/// a consistent per-session protocol stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProtocolSet {
    /// Plain cleartext HTTP/1.1 sessions allowed.
    pub http: bool,
    /// TLS-wrapped sessions allowed.
    pub tls: bool,
    /// HTTP/2 sessions allowed.
    pub h2: bool,
}

impl ProtocolSet {
    /// All three families enabled.
    pub fn all() -> Self {
        Self {
            http: true,
            tls: true,
            h2: true,
        }
    }

    /// Whether at least one family is enabled.
    pub fn any(&self) -> bool {
        self.http || self.tls || self.h2
    }

    /// Resolve a list of protocol tokens (`http`, `tls`, `h2`, `all`,
    /// case-insensitive, surrounding whitespace ignored).
    ///
    /// Unrecognized tokens are collected and returned for the caller to
    /// warn about; they are never fatal.
    ///
    /// # Examples
    ///
    /// ```
    /// use mockwire_gen::ProtocolSet;
    ///
    /// let (set, unknown) = ProtocolSet::from_tokens(["tls", "H2", "quic"]);
    /// assert!(!set.http && set.tls && set.h2);
    /// assert_eq!(unknown, vec!["quic".to_string()]);
    /// ```
    pub fn from_tokens<'a, I>(tokens: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Self {
            http: false,
            tls: false,
            h2: false,
        };
        let mut unknown = Vec::new();
        for token in tokens {
            match token.trim().to_ascii_lowercase().as_str() {
                "http" => set.http = true,
                "tls" => set.tls = true,
                "h2" => set.h2 = true,
                "all" => set = Self::all(),
                other => unknown.push(other.to_string()),
            }
        }
        (set, unknown)
    }
}

impl Default for ProtocolSet {
    fn default() -> Self {
        Self::all()
    }
}

// ── GeneratorConfig ─────────────────────────────────────────────

/// Input configuration for one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Exact number of transactions to generate across the whole corpus.
    pub total_transactions: u64,
    /// Sessions-per-file sampling range.
    pub session_bounds: Bounds,
    /// Transactions-per-session sampling range.
    pub transaction_bounds: Bounds,
    /// Enabled protocol families.
    pub protocols: ProtocolSet,
}

impl GeneratorConfig {
    /// A config for `total` transactions with default bounds and all
    /// protocol families enabled.
    pub fn new(total: u64) -> Self {
        Self {
            total_transactions: total,
            session_bounds: Bounds::default(),
            transaction_bounds: Bounds::default(),
            protocols: ProtocolSet::all(),
        }
    }

    /// Check structural invariants. Called by
    /// [`CorpusPartitioner::new`](crate::CorpusPartitioner::new) before
    /// any sampling happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_transactions == 0 {
            return Err(ConfigError::ZeroTransactions);
        }
        self.session_bounds.validate("session")?;
        self.transaction_bounds.validate("transaction")?;
        // Zero upper bounds would sample zero-size units forever without
        // ever consuming the budget.
        if self.session_bounds.upper == 0 {
            return Err(ConfigError::ZeroUpperBound { what: "session" });
        }
        if self.transaction_bounds.upper == 0 {
            return Err(ConfigError::ZeroUpperBound { what: "transaction" });
        }
        if !self.protocols.any() {
            return Err(ConfigError::NoProtocolsEnabled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_are_ten_ten() {
        assert_eq!(Bounds::default(), Bounds::new(10, 10));
    }

    #[test]
    fn inverted_bounds_rejected_before_generation() {
        let mut cfg = GeneratorConfig::new(100);
        cfg.transaction_bounds = Bounds::new(5, 2);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidBounds {
                what: "transaction",
                lower: 5,
                upper: 2,
            })
        );

        let mut cfg = GeneratorConfig::new(100);
        cfg.session_bounds = Bounds::new(9, 1);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidBounds { what: "session", .. })
        ));
    }

    #[test]
    fn zero_upper_bounds_rejected() {
        let mut cfg = GeneratorConfig::new(5);
        cfg.session_bounds = Bounds::new(0, 0);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroUpperBound { what: "session" })
        );

        let mut cfg = GeneratorConfig::new(5);
        cfg.transaction_bounds = Bounds::new(0, 0);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroUpperBound { what: "transaction" })
        );
    }

    #[test]
    fn zero_total_rejected() {
        assert_eq!(
            GeneratorConfig::new(0).validate(),
            Err(ConfigError::ZeroTransactions)
        );
    }

    #[test]
    fn empty_protocol_set_rejected() {
        let mut cfg = GeneratorConfig::new(1);
        cfg.protocols = ProtocolSet {
            http: false,
            tls: false,
            h2: false,
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoProtocolsEnabled));
    }

    #[test]
    fn token_resolution_matches_cli_contract() {
        let (set, unknown) = ProtocolSet::from_tokens([" http ", "TLS"]);
        assert!(set.http && set.tls && !set.h2);
        assert!(unknown.is_empty());

        let (set, unknown) = ProtocolSet::from_tokens(["spdy", "all"]);
        assert_eq!(set, ProtocolSet::all());
        assert_eq!(unknown, vec!["spdy".to_string()]);
    }

    #[test]
    fn sampling_respects_degenerate_range() {
        let mut rng = rand::rng();
        assert_eq!(Bounds::new(4, 4).sample(&mut rng), 4);
    }
}
