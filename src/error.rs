//! Relay error taxonomy with Axum response mapping.
//!
//! Validation and authentication failures are answered locally, upstream
//! rejections pass through untouched, and transport faults collapse to a
//! generic 500.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::types::{INVALID_BODY_MESSAGE, SERVER_ERROR_MESSAGE, UNAUTHENTICATED_MESSAGE};
use crate::upstream::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Malformed proxy path or missing field; never forwarded upstream.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    Unauthenticated,

    /// Non-2xx answer from the upstream, relayed verbatim.
    #[error("Upstream responded with {status}")]
    Upstream {
        status: StatusCode,
        body: Option<Value>,
    },

    /// Network failure, timeout or unreadable upstream response.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UpstreamError> for RelayError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::InvalidPath(msg) => RelayError::Validation(msg),
            UpstreamError::Timeout => RelayError::Transport("upstream timed out".into()),
            UpstreamError::RequestFailed(cause) => {
                tracing::warn!(error = %cause, "Upstream request failed");
                RelayError::Transport("upstream request failed".into())
            }
            UpstreamError::InvalidBody(cause) => {
                tracing::warn!(error = %cause, "Upstream response could not be parsed");
                RelayError::Transport("invalid upstream response".into())
            }
            UpstreamError::InvalidToken => {
                RelayError::Transport("upstream issued an unusable token".into())
            }
        }
    }
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        RelayError::Validation(INVALID_BODY_MESSAGE.into())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({"message": msg}))).into_response()
            }
            RelayError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": UNAUTHENTICATED_MESSAGE})),
            )
                .into_response(),
            RelayError::Upstream { status, body } => relay_response(status, body),
            RelayError::Transport(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"message": SERVER_ERROR_MESSAGE, "error": msg})),
            )
                .into_response(),
            RelayError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal relay error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": SERVER_ERROR_MESSAGE, "error": "internal error"})),
                )
                    .into_response()
            }
        }
    }
}

/// Build a response carrying an upstream status and body unchanged.
///
/// An empty upstream body stays empty.
pub fn relay_response(status: StatusCode, body: Option<Value>) -> Response {
    match body {
        Some(value) => (status, Json(value)).into_response(),
        None => status.into_response(),
    }
}

/// Map a raw upstream status onto something safe to hand to a browser.
///
/// Anything outside 100..=599 (including the 0 some transports report on
/// failure) becomes 502.
pub fn clamp_status(raw: u16) -> StatusCode {
    if (100..=599).contains(&raw) {
        StatusCode::from_u16(raw).unwrap_or(StatusCode::BAD_GATEWAY)
    } else {
        StatusCode::BAD_GATEWAY
    }
}
