//! ALL /api/proxy/*

use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use std::sync::Arc;

use crate::error::{RelayError, relay_response};
use crate::session::TokenStore;
use crate::upstream::ForwardRequest;

/// Forward everything under the proxy prefix to the upstream.
///
/// `/api/proxy/<rest>` becomes `<upstream>/<rest>` (percent-decoded). The
/// session token is attached when present; the upstream answer, success or
/// not, is relayed verbatim.
pub async fn forward(
    State(state): State<Arc<crate::AppState>>,
    store: TokenStore,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    let prefix = format!("{}/proxy", state.config.api_prefix.trim_end_matches('/'));
    let rest = uri
        .path()
        .strip_prefix(prefix.as_str())
        .ok_or_else(|| RelayError::Validation("path is outside the proxy prefix".into()))?;

    let request = ForwardRequest::from_encoded_path(rest)?
        .method(method)
        .query(uri.query())
        .headers(&headers)
        .body(body);

    let token = store.token().await;
    let result = state
        .upstream
        .forward(request, token.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, path = %rest, "Proxied request failed");
            RelayError::from(e)
        })?;

    Ok(relay_response(result.status, result.data))
}
