//! URL pool: parsed candidate URLs partitioned by scheme.
//!
//! The pool is split into secure (`https`) and cleartext subsets at
//! construction time, so scheme-constrained selection draws from the
//! right subset directly. A missing subset surfaces as an explicit
//! [`SelectError::NoMatchingUrl`] instead of an unbounded retry loop.

use rand::Rng;
use url::Url;

use crate::error::{ConfigError, SelectError};

/// One candidate URL, reduced to the pieces a session needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Network location: host, plus `:port` when one was given.
    pub hostname: String,
    /// Path component.
    pub path: String,
    /// Whether the scheme was `https`.
    pub secure: bool,
}

/// A non-empty ordered pool of candidate URLs.
#[derive(Clone, Debug)]
pub struct UrlPool {
    entries: Vec<ParsedUrl>,
    secure: Vec<usize>,
    cleartext: Vec<usize>,
}

impl UrlPool {
    /// Parse a list of URL strings into a pool.
    ///
    /// Blank entries are skipped (URL files end with a trailing newline).
    /// Fails on an empty pool or an entry that does not parse as an
    /// absolute URL with a host.
    ///
    /// # Examples
    ///
    /// ```
    /// use mockwire_gen::UrlPool;
    ///
    /// let pool = UrlPool::parse(["http://a/x", "https://b:8443/y", ""]).unwrap();
    /// assert_eq!(pool.len(), 2);
    /// assert!(pool.has_secure() && pool.has_cleartext());
    /// ```
    pub fn parse<I, S>(urls: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        let mut secure = Vec::new();
        let mut cleartext = Vec::new();

        for raw in urls {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?;
            let host = parsed.host_str().ok_or_else(|| ConfigError::InvalidUrl {
                url: raw.to_string(),
                reason: "missing host".to_string(),
            })?;
            let hostname = match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            let entry = ParsedUrl {
                hostname,
                path: parsed.path().to_string(),
                secure: parsed.scheme() == "https",
            };
            let index = entries.len();
            if entry.secure {
                secure.push(index);
            } else {
                cleartext.push(index);
            }
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(ConfigError::EmptyUrlPool);
        }
        Ok(Self {
            entries,
            secure,
            cleartext,
        })
    }

    /// Number of URLs in the pool.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: construction rejects empty pools.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any `https` URL is present.
    pub fn has_secure(&self) -> bool {
        !self.secure.is_empty()
    }

    /// Whether any cleartext URL is present.
    pub fn has_cleartext(&self) -> bool {
        !self.cleartext.is_empty()
    }

    /// Draw uniformly from the whole pool.
    pub fn choose_any<R: Rng + ?Sized>(&self, rng: &mut R) -> &ParsedUrl {
        &self.entries[rng.random_range(0..self.entries.len())]
    }

    /// Draw uniformly from the secure subset.
    pub fn choose_secure<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&ParsedUrl, SelectError> {
        self.choose_subset(rng, &self.secure, true)
    }

    /// Draw uniformly from the cleartext subset.
    pub fn choose_cleartext<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<&ParsedUrl, SelectError> {
        self.choose_subset(rng, &self.cleartext, false)
    }

    fn choose_subset<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        subset: &[usize],
        secure: bool,
    ) -> Result<&ParsedUrl, SelectError> {
        if subset.is_empty() {
            return Err(SelectError::NoMatchingUrl { secure });
        }
        Ok(&self.entries[subset[rng.random_range(0..subset.len())]])
    }
}
