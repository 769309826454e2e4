//! Session assembly.
//!
//! One session = one protocol selection, a layer stack derived from it,
//! a connection timestamp captured at creation time, and N synthesized
//! transactions sharing the same [`ProtocolContext`].

use std::time::{SystemTime, UNIX_EPOCH};

use mockwire_core::{Layer, Session};
use rand::Rng;

use crate::config::ProtocolSet;
use crate::error::SelectError;
use crate::select::{select_protocol, ProtocolContext};
use crate::synth::synthesize_transaction;
use crate::urls::UrlPool;

/// Build one session with `transaction_count` transactions.
///
/// The protocol combination is selected once and shared by every
/// transaction in the session. A zero transaction count is legal: the
/// partitioner's final session may absorb an empty remainder.
pub fn build_session<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &UrlPool,
    protocols: ProtocolSet,
    transaction_count: u64,
) -> Result<Session, SelectError> {
    let ctx = select_protocol(rng, pool, protocols)?;

    let transactions = (0..transaction_count)
        .map(|_| synthesize_transaction(rng, &ctx))
        .collect();

    Ok(Session {
        protocol: layer_stack(&ctx),
        connection_time: unix_nanos_now(),
        transactions,
    })
}

/// The `[http, tls?, tcp, ip]` layer stack for a protocol context.
fn layer_stack(ctx: &ProtocolContext) -> Vec<Layer> {
    let mut stack = Vec::with_capacity(4);
    stack.push(Layer::Http { version: ctx.http });
    if let Some(tls) = ctx.tls {
        stack.push(Layer::tls(tls, ctx.hostname.clone()));
    }
    stack.push(Layer::Tcp);
    stack.push(Layer::Ip { version: ctx.ip });
    stack
}

fn unix_nanos_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockwire_core::{HttpVersion, IpVersion, TlsVersion};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn layer_order_is_http_tls_tcp_ip() {
        let ctx = ProtocolContext {
            hostname: "b".to_string(),
            path: "/y".to_string(),
            tls: Some(TlsVersion::V1_2),
            http: HttpVersion::H2,
            ip: IpVersion::V4,
        };
        let stack = layer_stack(&ctx);
        assert_eq!(stack.len(), 4);
        assert!(matches!(stack[0], Layer::Http { .. }));
        assert!(matches!(
            &stack[1],
            Layer::Tls { sni, .. } if sni == "b"
        ));
        assert!(matches!(stack[2], Layer::Tcp));
        assert!(matches!(stack[3], Layer::Ip { .. }));
    }

    #[test]
    fn cleartext_stack_has_no_tls_layer() {
        let ctx = ProtocolContext {
            hostname: "a".to_string(),
            path: "/x".to_string(),
            tls: None,
            http: HttpVersion::H1,
            ip: IpVersion::V6,
        };
        let stack = layer_stack(&ctx);
        assert_eq!(stack.len(), 3);
        assert!(!stack.iter().any(|l| matches!(l, Layer::Tls { .. })));
    }

    #[test]
    fn session_carries_requested_transaction_count() {
        let pool = UrlPool::parse(["http://a/x", "https://b/y"]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let session = build_session(&mut rng, &pool, ProtocolSet::all(), 5).unwrap();
        assert_eq!(session.transactions.len(), 5);
        assert!(session.connection_time > 0);
    }

    #[test]
    fn zero_transaction_session_is_legal() {
        let pool = UrlPool::parse(["http://a/x"]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(32);
        let session = build_session(&mut rng, &pool, ProtocolSet::all(), 0).unwrap();
        assert!(session.transactions.is_empty());
        assert!(session.http_version().is_some());
    }
}
