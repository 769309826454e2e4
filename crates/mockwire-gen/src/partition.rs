//! Corpus partitioning: exact budget, uneven split.
//!
//! [`CorpusPartitioner`] splits a global transaction budget across files
//! and sessions under randomized per-unit bounds while guaranteeing the
//! exact requested total. It yields one completed file per call so the
//! caller can serialize between files.
//!
//! Exactness takes priority over per-session bounds: the final session of
//! the final file absorbs whatever remainder is left, which may be below
//! the configured lower bound or even zero.

use mockwire_core::ReplayFile;
use rand::Rng;

use crate::config::{Bounds, GeneratorConfig, ProtocolSet};
use crate::error::{ConfigError, SelectError};
use crate::session::build_session;
use crate::urls::UrlPool;

/// One completed file plus its generation tallies.
///
/// `session_count` reflects sessions actually built, which is less than
/// the sampled target when the budget ran out early.
#[derive(Clone, Debug)]
pub struct GeneratedFile {
    /// The assembled replay records.
    pub file: ReplayFile,
    /// Sessions actually built into this file.
    pub session_count: u64,
    /// Transactions across all sessions in this file.
    pub transaction_count: u64,
}

/// Top-level generation driver.
///
/// # Examples
///
/// ```
/// use mockwire_gen::{CorpusPartitioner, GeneratorConfig, UrlPool};
/// use rand::SeedableRng;
///
/// let pool = UrlPool::parse(["http://a/x"]).unwrap();
/// let cfg = GeneratorConfig::new(25);
/// let mut partitioner = CorpusPartitioner::new(&cfg, &pool).unwrap();
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
///
/// let mut total = 0;
/// while let Some(generated) = partitioner.next_file(&mut rng) {
///     total += generated.unwrap().transaction_count;
/// }
/// assert_eq!(total, 25);
/// ```
#[derive(Debug)]
pub struct CorpusPartitioner<'a> {
    pool: &'a UrlPool,
    protocols: ProtocolSet,
    session_bounds: Bounds,
    transaction_bounds: Bounds,
    remaining: u64,
}

impl<'a> CorpusPartitioner<'a> {
    /// Validate the configuration and set up the budget.
    ///
    /// All configuration errors surface here, before any sampling.
    pub fn new(config: &GeneratorConfig, pool: &'a UrlPool) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pool,
            protocols: config.protocols,
            session_bounds: config.session_bounds,
            transaction_bounds: config.transaction_bounds,
            remaining: config.total_transactions,
        })
    }

    /// Transactions still to be generated.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Generate the next file, or `None` once the budget is exhausted.
    pub fn next_file<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<Result<GeneratedFile, SelectError>> {
        if self.remaining == 0 {
            return None;
        }
        Some(self.build_file(rng))
    }

    fn build_file<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GeneratedFile, SelectError> {
        let sessions_wanted = self.session_bounds.sample(rng);
        let mut file = ReplayFile::new();
        let mut transaction_count = 0u64;

        for _ in 0..sessions_wanted {
            // Draw from the bounds only while a full-sized session still
            // fits in the budget; otherwise the session absorbs the exact
            // remainder, bounds notwithstanding.
            let session_transactions = if self.remaining >= self.transaction_bounds.upper {
                self.transaction_bounds.sample(rng)
            } else {
                self.remaining
            };
            self.remaining -= session_transactions;
            transaction_count += session_transactions;

            let session = build_session(rng, self.pool, self.protocols, session_transactions)?;
            file.sessions.push(session);

            if self.remaining == 0 {
                break;
            }
        }

        let session_count = file.sessions.len() as u64;
        Ok(GeneratedFile {
            file,
            session_count,
            transaction_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pool() -> UrlPool {
        UrlPool::parse(["http://a/x", "https://b/y"]).unwrap()
    }

    fn collect(cfg: &GeneratorConfig, seed: u64) -> Vec<GeneratedFile> {
        let pool = pool();
        let mut partitioner = CorpusPartitioner::new(cfg, &pool).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut files = Vec::new();
        while let Some(generated) = partitioner.next_file(&mut rng) {
            files.push(generated.unwrap());
        }
        files
    }

    fn arb_bounds(min_upper: u64) -> impl Strategy<Value = Bounds> {
        (0u64..6, 0u64..6).prop_map(move |(lower, extra)| {
            let upper = (lower + extra).max(min_upper);
            Bounds::new(lower.min(upper), upper)
        })
    }

    proptest! {
        #[test]
        fn exact_total_always_reached(
            total in 1u64..400,
            session_bounds in arb_bounds(1),
            transaction_bounds in arb_bounds(1),
            seed in any::<u64>(),
        ) {
            let cfg = GeneratorConfig {
                total_transactions: total,
                session_bounds,
                transaction_bounds,
                protocols: ProtocolSet::all(),
            };
            let files = collect(&cfg, seed);

            let sum: u64 = files.iter().map(|f| f.transaction_count).sum();
            prop_assert_eq!(sum, total);

            // Tallies agree with the records themselves.
            for f in &files {
                prop_assert_eq!(f.file.transaction_count(), f.transaction_count);
                prop_assert_eq!(f.file.sessions.len() as u64, f.session_count);
            }
        }

        #[test]
        fn bounds_hold_except_at_the_tail(
            total in 1u64..400,
            session_bounds in arb_bounds(1),
            transaction_bounds in arb_bounds(1),
            seed in any::<u64>(),
        ) {
            let cfg = GeneratorConfig {
                total_transactions: total,
                session_bounds,
                transaction_bounds,
                protocols: ProtocolSet::all(),
            };
            let files = collect(&cfg, seed);

            for (i, f) in files.iter().enumerate() {
                let last_file = i == files.len() - 1;
                prop_assert!(f.session_count <= session_bounds.upper);
                if !last_file {
                    prop_assert!(f.session_count >= session_bounds.lower);
                }
                let session_total = f.file.sessions.len();
                for (j, s) in f.file.sessions.iter().enumerate() {
                    let n = s.transactions.len() as u64;
                    prop_assert!(n <= transaction_bounds.upper);
                    let global_last = last_file && j == session_total - 1;
                    if !global_last {
                        prop_assert!(n >= transaction_bounds.lower);
                    }
                }
            }
        }
    }

    #[test]
    fn same_seed_same_corpus() {
        let cfg = GeneratorConfig::new(57);
        let scrub = |mut files: Vec<GeneratedFile>| {
            for f in &mut files {
                for s in &mut f.file.sessions {
                    s.connection_time = 0;
                }
            }
            files
        };
        let a = scrub(collect(&cfg, 99));
        let b = scrub(collect(&cfg, 99));
        let c = scrub(collect(&cfg, 100));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.file, y.file);
        }
        let differs = a.len() != c.len()
            || a.iter().zip(&c).any(|(x, y)| x.file != y.file);
        assert!(differs, "different seeds should diverge");
    }

    #[test]
    fn selection_failure_surfaces_not_spins() {
        // TLS-only mode with a pool that has no https URL.
        let pool = UrlPool::parse(["http://a/x"]).unwrap();
        let cfg = GeneratorConfig {
            total_transactions: 10,
            session_bounds: Bounds::default(),
            transaction_bounds: Bounds::default(),
            protocols: ProtocolSet {
                http: false,
                tls: true,
                h2: false,
            },
        };
        let mut partitioner = CorpusPartitioner::new(&cfg, &pool).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        let result = partitioner.next_file(&mut rng).unwrap();
        assert_eq!(
            result.unwrap_err(),
            SelectError::NoMatchingUrl { secure: true }
        );
    }
}
