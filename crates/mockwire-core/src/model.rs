//! Typed records for replay files.
//!
//! A replay file describes a set of hypothetical client/server sessions
//! for a proxy under test: per-session protocol stacks and per-transaction
//! request/response exchanges. Records are built once, top-down, and never
//! mutated after construction.
//!
//! Serde attributes pin the serialized layout to the harness format:
//! kebab-case keys, `name`-tagged protocol layers, and header fields as
//! ordered two-element arrays.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::FORMAT_VERSION;

// ── Protocol versions ───────────────────────────────────────────

/// HTTP protocol version for a session.
///
/// Serializes as the bare number the harness expects: `1.1` or `2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpVersion {
    /// HTTP/1.1.
    H1,
    /// HTTP/2.
    H2,
}

impl HttpVersion {
    /// The version as it appears in an HTTP/1.1 request line (`"1.1"`, `"2"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "1.1",
            Self::H2 => "2",
        }
    }
}

impl Serialize for HttpVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::H1 => serializer.serialize_f64(1.1),
            Self::H2 => serializer.serialize_u64(2),
        }
    }
}

/// TLS protocol version for a session's security layer.
///
/// Serializes as the registry label (`"TLSv1.2"` etc.). Absence of TLS is
/// modeled as `Option<TlsVersion>::None`, not a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlsVersion {
    /// TLS 1.1.
    V1_1,
    /// TLS 1.2.
    V1_2,
    /// TLS 1.3.
    V1_3,
}

impl TlsVersion {
    /// The label used in the replay file (`"TLSv1.1"` | `"TLSv1.2"` | `"TLSv1.3"`).
    pub fn label(self) -> &'static str {
        match self {
            Self::V1_1 => "TLSv1.1",
            Self::V1_2 => "TLSv1.2",
            Self::V1_3 => "TLSv1.3",
        }
    }

    /// Whether this version satisfies the HTTP/2 minimum (TLS 1.2 or newer).
    pub fn h2_capable(self) -> bool {
        !matches!(self, Self::V1_1)
    }
}

impl Serialize for TlsVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// IP version for a session's network layer. Serializes as `4` or `6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IpVersion {
    /// IPv4.
    V4,
    /// IPv6.
    V6,
}

impl Serialize for IpVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::V4 => 4,
            Self::V6 => 6,
        })
    }
}

// ── Protocol layer stack ────────────────────────────────────────

/// One layer in a session's protocol stack.
///
/// Stack order is always `[http, tls?, tcp, ip]`: the `tls` layer is
/// present exactly when the session's URL had a secure scheme, the other
/// three are always present.
///
/// # Examples
///
/// ```
/// use mockwire_core::Layer;
///
/// let tcp = serde_json::to_value(Layer::Tcp).unwrap();
/// assert_eq!(tcp, serde_json::json!({"name": "tcp"}));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Layer {
    /// Application layer: HTTP/1.1 or HTTP/2.
    Http {
        /// Negotiated HTTP version.
        version: HttpVersion,
    },
    /// Security layer, present only for secure-scheme sessions.
    Tls {
        /// Negotiated TLS version.
        version: TlsVersion,
        /// Server name indication; always the session hostname.
        sni: String,
        /// Verification mode the proxy should apply (always 0).
        #[serde(rename = "proxy-verify-mode")]
        proxy_verify_mode: u32,
        /// Whether the proxy presents its own certificate (always true).
        #[serde(rename = "proxy-provided-cert")]
        proxy_provided_cert: bool,
    },
    /// Transport layer.
    Tcp,
    /// Network layer.
    Ip {
        /// IP version in use.
        version: IpVersion,
    },
}

impl Layer {
    /// Convenience constructor for a TLS layer with the fixed proxy fields.
    pub fn tls(version: TlsVersion, sni: impl Into<String>) -> Self {
        Self::Tls {
            version,
            sni: sni.into(),
            proxy_verify_mode: 0,
            proxy_provided_cert: true,
        }
    }
}

// ── Header fields ───────────────────────────────────────────────

/// A header field value: string or bare integer.
///
/// The harness format carries `Content-Length` and `:status` values as
/// integers and everything else as strings, so the distinction is kept
/// rather than stringifying everything.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A string-valued field.
    Str(String),
    /// An integer-valued field.
    Int(u64),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::Int(v)
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        Self::Int(u64::from(v))
    }
}

/// An ordered list of header fields.
///
/// Deliberately NOT a map: duplicate names are legal and insertion order
/// is semantic (HTTP/2 pseudo-headers must precede regular fields).
/// Serializes as `{"fields": [[name, value], ...]}`.
///
/// # Examples
///
/// ```
/// use mockwire_core::Headers;
///
/// let mut h = Headers::new();
/// h.push("Host", "example.com");
/// h.push("Content-Length", 42u64);
/// assert_eq!(h.fields.len(), 2);
///
/// let v = serde_json::to_value(&h).unwrap();
/// assert_eq!(
///     v,
///     serde_json::json!({"fields": [["Host", "example.com"], ["Content-Length", 42]]})
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Headers {
    /// Ordered `[name, value]` pairs.
    pub fields: Vec<(String, FieldValue)>,
}

impl Headers {
    /// Create an empty field list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, preserving insertion order.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Look up the first field with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Whether a field with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

// ── Message bodies ──────────────────────────────────────────────

/// Body description for a request or response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Content {
    /// Body encoding; the generator only emits `"plain"`.
    pub encoding: String,
    /// Body size in bytes.
    pub size: u64,
}

impl Content {
    /// A plain-encoded body of the given size.
    pub fn plain(size: u64) -> Self {
        Self {
            encoding: "plain".to_string(),
            size,
        }
    }
}

// ── Transaction records ─────────────────────────────────────────

/// The client side of one exchange.
///
/// The four scalar fields are populated for HTTP/1.1 requests and absent
/// for HTTP/2 requests, where the same information travels as
/// `:method` / `:scheme` / `:authority` / `:path` pseudo-header fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientRequest {
    /// Request method (HTTP/1.1 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Request scheme, `http` or `https` (HTTP/1.1 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Request target path (HTTP/1.1 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Protocol version string (HTTP/1.1 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Ordered request header fields.
    pub headers: Headers,
    /// Request body description.
    pub content: Content,
}

/// The server side of one exchange.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServerResponse {
    /// Response status code.
    pub status: u16,
    /// Reason phrase matching the status code.
    pub reason: String,
    /// Ordered response header fields.
    pub headers: Headers,
    /// Response body description.
    pub content: Content,
}

/// What the proxy under test is expected to answer.
///
/// A pure pass-through of the server response's status and reason; the
/// generator models the proxy as protocol-transparent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProxyResponse {
    /// Status code, equal to the server response's.
    pub status: u16,
    /// Reason phrase, equal to the server response's.
    pub reason: String,
}

/// One simulated request/response exchange.
///
/// Belongs to exactly one [`Session`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transaction {
    /// The synthesized client request.
    #[serde(rename = "client-request")]
    pub client_request: ClientRequest,
    /// The synthesized server response.
    #[serde(rename = "server-response")]
    pub server_response: ServerResponse,
    /// The expected proxy response.
    #[serde(rename = "proxy-response")]
    pub proxy_response: ProxyResponse,
}

// ── Session and file ────────────────────────────────────────────

/// One simulated client connection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Session {
    /// Protocol layer stack, outermost application layer first.
    pub protocol: Vec<Layer>,
    /// Connection timestamp, nanoseconds since the Unix epoch.
    #[serde(rename = "connection-time")]
    pub connection_time: u64,
    /// Exchanges carried on this connection, in order.
    pub transactions: Vec<Transaction>,
}

impl Session {
    /// The session's HTTP version, read back from the protocol stack.
    pub fn http_version(&self) -> Option<HttpVersion> {
        self.protocol.iter().find_map(|l| match l {
            Layer::Http { version } => Some(*version),
            _ => None,
        })
    }

    /// Whether the protocol stack carries a TLS layer.
    pub fn has_tls(&self) -> bool {
        self.protocol.iter().any(|l| matches!(l, Layer::Tls { .. }))
    }
}

/// File-level metadata. Serialized as `{"version": "1.0"}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Meta;

impl Serialize for Meta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Meta", 1)?;
        s.serialize_field("version", FORMAT_VERSION)?;
        s.end()
    }
}

/// One replay file: format metadata plus an ordered run of sessions.
///
/// Created by the corpus partitioner, serialized by the caller, and never
/// revised afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReplayFile {
    /// Format metadata.
    pub meta: Meta,
    /// Sessions in generation order.
    pub sessions: Vec<Session>,
}

impl ReplayFile {
    /// An empty file with current-version metadata.
    pub fn new() -> Self {
        Self {
            meta: Meta,
            sessions: Vec::new(),
        }
    }

    /// Total transaction count across all sessions.
    pub fn transaction_count(&self) -> u64 {
        self.sessions.iter().map(|s| s.transactions.len() as u64).sum()
    }
}

impl Default for ReplayFile {
    fn default() -> Self {
        Self::new()
    }
}
