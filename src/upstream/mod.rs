//! Upstream API access: request descriptors, responses, and the HTTP client.

pub mod client;

pub use client::UpstreamClient;

use axum::body::Bytes;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use serde_json::Value;

use crate::error::RelayError;
use crate::session::cookie::COOKIE_NAME;

/// Header naming the upstream service a proxied call is meant for.
/// Consumed by the relay, never forwarded.
pub const SERVICE_ID_HEADER: HeaderName = HeaderName::from_static("x-service-id");

/// Headers that describe the browser-to-relay hop and must not reach the upstream.
///
/// `accept-encoding` is negotiated by the relay's own client, which decodes
/// the reply before parsing it.
const HOP_HEADERS: [HeaderName; 6] = [
    header::HOST,
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::ACCEPT_ENCODING,
    SERVICE_ID_HEADER,
];

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid proxy path: {0}")]
    InvalidPath(String),

    #[error("upstream request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("unparseable upstream response: {0}")]
    InvalidBody(String),

    #[error("token cannot be sent as a header")]
    InvalidToken,
}

/// Status and parsed JSON body of an upstream call.
///
/// `data` is `None` when the upstream sent an empty body.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub data: Option<Value>,
}

impl UpstreamResponse {
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Hand the response back to the browser unchanged.
    pub fn into_relay_error(self) -> RelayError {
        RelayError::Upstream {
            status: self.status,
            body: self.data,
        }
    }
}

/// One proxied call, built from the inbound request.
///
/// Method defaults to GET; the body is only sent for POST, PUT and PATCH.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub path: String,
    pub query: Option<String>,
    pub method: Method,
    pub body: Option<Bytes>,
    pub headers: HeaderMap,
    pub service_id: Option<String>,
}

impl ForwardRequest {
    /// Start a descriptor for an already decoded upstream path.
    pub fn new(path: impl Into<String>) -> Result<Self, UpstreamError> {
        let path = path.into();
        validate_path(&path)?;
        Ok(Self {
            path,
            query: None,
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
            service_id: None,
        })
    }

    /// Start a descriptor from the percent-encoded remainder after the proxy prefix.
    pub fn from_encoded_path(raw: &str) -> Result<Self, UpstreamError> {
        let decoded = urlencoding::decode(raw)
            .map_err(|_| UpstreamError::InvalidPath("path is not valid UTF-8".into()))?;
        Self::new(decoded.into_owned())
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn query(mut self, query: Option<&str>) -> Self {
        self.query = query.filter(|q| !q.is_empty()).map(String::from);
        self
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = (!body.is_empty()).then_some(body);
        self
    }

    /// Copy inbound headers, minus hop headers and the session cookie; the
    /// service id is kept aside.
    pub fn headers(mut self, inbound: &HeaderMap) -> Self {
        self.service_id = inbound
            .get(&SERVICE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        let mut headers = inbound.clone();
        for name in &HOP_HEADERS {
            headers.remove(name);
        }
        strip_session_cookie(&mut headers);
        self.headers = headers;
        self
    }

    /// Body to send, honoring the write-verb rule.
    pub fn outbound_body(&self) -> Option<&Bytes> {
        if carries_body(&self.method) {
            self.body.as_ref()
        } else {
            None
        }
    }

    /// Path plus query, appended to the upstream base URL.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }
}

/// Drop `auth_token` from the `Cookie` header(s); the token travels as a
/// bearer header instead. Other cookies are folded into a single header.
fn strip_session_cookie(headers: &mut HeaderMap) {
    let kept: Vec<String> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .map(str::trim)
        .filter(|pair| {
            let name = pair.split_once('=').map_or(*pair, |(name, _)| name);
            !pair.is_empty() && name.trim() != COOKIE_NAME
        })
        .map(String::from)
        .collect();

    headers.remove(header::COOKIE);
    if kept.is_empty() {
        return;
    }
    match HeaderValue::from_str(&kept.join("; ")) {
        Ok(value) => {
            headers.insert(header::COOKIE, value);
        }
        Err(_) => tracing::debug!("Dropping unrepresentable Cookie header from forwarded request"),
    }
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

fn validate_path(path: &str) -> Result<(), UpstreamError> {
    if path.is_empty() {
        return Err(UpstreamError::InvalidPath("path is empty".into()));
    }
    if !path.starts_with('/') {
        return Err(UpstreamError::InvalidPath("path must start with '/'".into()));
    }
    if path.chars().any(char::is_control) {
        return Err(UpstreamError::InvalidPath(
            "path contains control characters".into(),
        ));
    }
    Ok(())
}
