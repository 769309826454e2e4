//! Protocol combination selection.
//!
//! Given the enabled protocol families and the URL pool, picks one
//! mutually consistent combination of hostname, path, TLS version, HTTP
//! version, and IP version. Computed once per session and threaded into
//! every transaction synthesized within it.

use mockwire_core::{HttpVersion, IpVersion, TlsVersion};
use rand::Rng;

use crate::config::ProtocolSet;
use crate::error::SelectError;
use crate::urls::UrlPool;

/// The protocol choices for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolContext {
    /// Hostname from the chosen URL.
    pub hostname: String,
    /// Path from the chosen URL.
    pub path: String,
    /// TLS version, `None` for cleartext sessions.
    pub tls: Option<TlsVersion>,
    /// Negotiated HTTP version.
    pub http: HttpVersion,
    /// IP version for the network layer.
    pub ip: IpVersion,
}

impl ProtocolContext {
    /// The request scheme implied by the TLS choice.
    pub fn scheme(&self) -> &'static str {
        if self.tls.is_some() {
            "https"
        } else {
            "http"
        }
    }
}

/// Pick a consistent protocol combination for one session.
///
/// Branch order matters and mirrors the mode table:
///
/// 1. Neither `tls` nor `h2` enabled: cleartext HTTP/1.1 only, so the URL
///    must come from the cleartext subset.
/// 2. `http` disabled: every session is TLS-wrapped, so the URL must come
///    from the secure subset.
/// 3. Mixed: any URL; its scheme decides whether a TLS version is drawn.
///
/// The TLS version is drawn from {1.2, 1.3} when h2 is the only reason a
/// TLS session can exist (`h2 && !tls`), since HTTP/2 needs TLS 1.2+;
/// otherwise from {1.1, 1.2, 1.3}.
pub fn select_protocol<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &UrlPool,
    protocols: ProtocolSet,
) -> Result<ProtocolContext, SelectError> {
    let h2_floor = protocols.h2 && !protocols.tls;

    let (url, tls) = if !protocols.tls && !protocols.h2 {
        (pool.choose_cleartext(rng)?, None)
    } else if !protocols.http {
        let url = pool.choose_secure(rng)?;
        (url, Some(random_tls_version(rng, h2_floor)))
    } else {
        let url = pool.choose_any(rng);
        let tls = url
            .secure
            .then(|| random_tls_version(rng, h2_floor));
        (url, tls)
    };

    let http = if protocols.h2 && tls.is_some_and(TlsVersion::h2_capable) {
        if !protocols.tls {
            // TLS 1.2/1.3 was drawn purely to carry HTTP/2 here, so there
            // is no version coin flip.
            HttpVersion::H2
        } else if rng.random() {
            HttpVersion::H2
        } else {
            HttpVersion::H1
        }
    } else {
        HttpVersion::H1
    };

    let ip = if rng.random() {
        IpVersion::V4
    } else {
        IpVersion::V6
    };

    Ok(ProtocolContext {
        hostname: url.hostname.clone(),
        path: url.path.clone(),
        tls,
        http,
        ip,
    })
}

fn random_tls_version<R: Rng + ?Sized>(rng: &mut R, h2_floor: bool) -> TlsVersion {
    const H2_CAPABLE: [TlsVersion; 2] = [TlsVersion::V1_2, TlsVersion::V1_3];
    const ALL: [TlsVersion; 3] = [TlsVersion::V1_1, TlsVersion::V1_2, TlsVersion::V1_3];
    if h2_floor {
        H2_CAPABLE[rng.random_range(0..H2_CAPABLE.len())]
    } else {
        ALL[rng.random_range(0..ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn mixed_pool() -> UrlPool {
        UrlPool::parse(["http://a/x", "https://b/y"]).unwrap()
    }

    #[test]
    fn pure_cleartext_mode_never_selects_tls() {
        let pool = mixed_pool();
        let protocols = ProtocolSet {
            http: true,
            tls: false,
            h2: false,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let ctx = select_protocol(&mut rng, &pool, protocols).unwrap();
            assert_eq!(ctx.tls, None);
            assert_eq!(ctx.http, HttpVersion::H1);
            assert_eq!(ctx.hostname, "a");
            assert_eq!(ctx.scheme(), "http");
        }
    }

    #[test]
    fn tls_only_sessions_are_all_secure() {
        let pool = mixed_pool();
        let protocols = ProtocolSet {
            http: false,
            tls: true,
            h2: false,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut saw_1_1 = false;
        for _ in 0..200 {
            let ctx = select_protocol(&mut rng, &pool, protocols).unwrap();
            assert_eq!(ctx.hostname, "b");
            assert!(ctx.tls.is_some());
            // Without h2 enabled the version never climbs to HTTP/2.
            assert_eq!(ctx.http, HttpVersion::H1);
            saw_1_1 |= ctx.tls == Some(TlsVersion::V1_1);
        }
        assert!(saw_1_1, "TLS 1.1 should appear when h2 is not enabled");
    }

    #[test]
    fn h2_only_mode_always_h2_over_tls12_plus() {
        let pool = mixed_pool();
        let protocols = ProtocolSet {
            http: false,
            tls: false,
            h2: true,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        for _ in 0..200 {
            let ctx = select_protocol(&mut rng, &pool, protocols).unwrap();
            assert_eq!(ctx.http, HttpVersion::H2);
            let tls = ctx.tls.expect("h2 sessions are TLS-wrapped");
            assert!(tls.h2_capable());
        }
    }

    #[test]
    fn mixed_mode_scheme_follows_url() {
        let pool = mixed_pool();
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let mut saw_secure = false;
        let mut saw_cleartext = false;
        for _ in 0..200 {
            let ctx = select_protocol(&mut rng, &pool, ProtocolSet::all()).unwrap();
            match ctx.hostname.as_str() {
                "a" => {
                    assert_eq!(ctx.tls, None);
                    assert_eq!(ctx.http, HttpVersion::H1);
                    saw_cleartext = true;
                }
                "b" => {
                    assert!(ctx.tls.is_some());
                    saw_secure = true;
                }
                other => panic!("unexpected hostname {other}"),
            }
        }
        assert!(saw_secure && saw_cleartext);
    }

    #[test]
    fn required_scheme_missing_is_an_error() {
        let pool = UrlPool::parse(["https://b/y"]).unwrap();
        let protocols = ProtocolSet {
            http: true,
            tls: false,
            h2: false,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        assert_eq!(
            select_protocol(&mut rng, &pool, protocols).unwrap_err(),
            SelectError::NoMatchingUrl { secure: false }
        );
    }

    #[test]
    fn ip_version_varies() {
        let pool = mixed_pool();
        let mut rng = ChaCha8Rng::seed_from_u64(16);
        let mut saw = (false, false);
        for _ in 0..100 {
            match select_protocol(&mut rng, &pool, ProtocolSet::all())
                .unwrap()
                .ip
            {
                IpVersion::V4 => saw.0 = true,
                IpVersion::V6 => saw.1 = true,
            }
        }
        assert!(saw.0 && saw.1);
    }
}
