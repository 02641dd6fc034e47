//! POST /api/auth/refresh

use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::audit::{self, Activity};
use crate::error::RelayError;
use crate::session::TokenStore;
use crate::session::cookie::is_valid_cookie_value;
use crate::types::{MessageResponse, REFRESH_SUCCESS_MESSAGE, extract_token};
use crate::upstream::UpstreamError;

/// Refresh the session token via the upstream and re-issue the cookie.
///
/// The relay does not retry: an upstream rejection clears the cookie and
/// answers 401, leaving re-authentication to the SPA.
pub async fn refresh_token(
    State(state): State<Arc<crate::AppState>>,
    store: TokenStore,
) -> Result<Json<MessageResponse>, RelayError> {
    let current = store.token().await.ok_or(RelayError::Unauthenticated)?;

    let result = state.upstream.refresh(&current).await.map_err(|e| {
        audit::authentication_event(
            Activity::ServiceTicket,
            false,
            None,
            &format!("Token refresh failed: {e}"),
        );
        RelayError::from(e)
    })?;

    if !result.ok() {
        // Refresh failure ends the session.
        store.set_token(None).await;
        audit::authentication_event(
            Activity::ServiceTicket,
            false,
            None,
            &format!("Upstream rejected refresh with {}", result.status),
        );
        return Err(RelayError::Unauthenticated);
    }

    // Upstreams that do not rotate keep the current token, with a fresh TTL.
    let token = result
        .data
        .as_ref()
        .and_then(extract_token)
        .unwrap_or(current);

    if !is_valid_cookie_value(&token) {
        store.set_token(None).await;
        tracing::error!("Upstream issued a token that cannot be stored in a cookie");
        return Err(UpstreamError::InvalidToken.into());
    }

    store.set_token(Some(token)).await;

    audit::authentication_event(Activity::ServiceTicket, true, None, "Token refresh succeeded");

    Ok(Json(MessageResponse::new(REFRESH_SUCCESS_MESSAGE)))
}
