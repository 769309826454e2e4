//! Transaction synthesis.
//!
//! Fills in one request/response exchange from a session's
//! [`ProtocolContext`]: method, header layout (HTTP/1.1 scalar fields vs
//! HTTP/2 pseudo-headers), body sizes, response status, and the proxy's
//! pass-through response.

use mockwire_core::{
    reason_phrase, ClientRequest, Content, Headers, HttpVersion, ProxyResponse, ServerResponse,
    Transaction,
};
use rand::Rng;
use uuid::Builder;

use crate::select::ProtocolContext;

const METHODS: [&str; 2] = ["GET", "POST"];
const STATUSES: [u16; 2] = [200, 404];

/// Largest request or response body, in bytes.
pub const MAX_BODY_SIZE: u64 = 1000;

/// Synthesize one transaction for a session with the given protocol context.
///
/// Every random draw comes from `rng`, so seeded generation is fully
/// deterministic. The `uuid` header gets its 128 bits from `rng` too,
/// formatted as a canonical 8-4-4-4-12 v4 identifier.
pub fn synthesize_transaction<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &ProtocolContext,
) -> Transaction {
    let method = METHODS[rng.random_range(0..METHODS.len())];
    let request_size = if method == "GET" {
        0
    } else {
        rng.random_range(1..=MAX_BODY_SIZE)
    };
    let request_id = random_request_id(rng);

    let client_request = match ctx.http {
        HttpVersion::H1 => ClientRequest {
            method: Some(method.to_string()),
            scheme: Some(ctx.scheme().to_string()),
            url: Some(ctx.path.clone()),
            version: Some(HttpVersion::H1.as_str().to_string()),
            headers: h1_request_headers(ctx, method, request_size, &request_id),
            content: Content::plain(request_size),
        },
        HttpVersion::H2 => ClientRequest {
            method: None,
            scheme: None,
            url: None,
            version: None,
            headers: h2_request_headers(ctx, method, request_size, &request_id),
            content: Content::plain(request_size),
        },
    };

    let status = STATUSES[rng.random_range(0..STATUSES.len())];
    let reason = reason_phrase(status)
        .expect("generated statuses come from the reason table")
        .to_string();
    let response_size = rng.random_range(1..=MAX_BODY_SIZE);

    let server_response = ServerResponse {
        status,
        reason: reason.clone(),
        headers: response_headers(rng, ctx.http, status, response_size),
        content: Content::plain(response_size),
    };

    // The proxy under test is modeled as protocol-transparent: its
    // response is the server response's status and reason, untouched.
    let proxy_response = ProxyResponse {
        status: server_response.status,
        reason,
    };

    Transaction {
        client_request,
        server_response,
        proxy_response,
    }
}

fn random_request_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid().to_string()
}

fn h1_request_headers(
    ctx: &ProtocolContext,
    method: &str,
    request_size: u64,
    request_id: &str,
) -> Headers {
    let mut headers = Headers::new();
    headers.push("Host", ctx.hostname.as_str());
    push_body_fields(&mut headers, method, request_size);
    headers.push("uuid", request_id);
    headers
}

fn h2_request_headers(
    ctx: &ProtocolContext,
    method: &str,
    request_size: u64,
    request_id: &str,
) -> Headers {
    // Pseudo-header fields must precede all regular fields.
    let mut headers = Headers::new();
    headers.push(":method", method);
    headers.push(":scheme", ctx.scheme());
    headers.push(":authority", ctx.hostname.as_str());
    headers.push(":path", ctx.path.as_str());
    push_body_fields(&mut headers, method, request_size);
    headers.push("uuid", request_id);
    headers
}

fn push_body_fields(headers: &mut Headers, method: &str, request_size: u64) {
    if method == "POST" {
        headers.push("Content-Type", "test/html");
        headers.push("Content-Length", request_size);
    }
}

fn response_headers<R: Rng + ?Sized>(
    rng: &mut R,
    http: HttpVersion,
    status: u16,
    response_size: u64,
) -> Headers {
    let mut headers = Headers::new();
    match http {
        HttpVersion::H1 => {
            // `Transfer-Encoding: chunked` is deliberately never emitted;
            // existing fixtures do not contain it and the harness relies
            // on Content-Length framing.
            let connection = if rng.random_range(0..11u32) == 0 {
                "close"
            } else {
                "keep-alive"
            };
            headers.push("Connection", connection);
        }
        HttpVersion::H2 => {
            headers.push(":status", status);
        }
    }
    headers.push("Content-Type", "text/html");
    headers.push("Content-Length", response_size);
    headers
}
