//! POST /api/auth/login

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

use crate::audit::{self, Activity};
use crate::error::RelayError;
use crate::session::TokenStore;
use crate::session::cookie::is_valid_cookie_value;
use crate::types::{LOGIN_SUCCESS_MESSAGE, LoginRequest, MessageResponse, extract_token};
use crate::upstream::UpstreamError;

/// Exchange credentials for an upstream token and keep it in the session cookie.
///
/// A rejected login relays the upstream's status and body unchanged; a 2xx
/// without a token is answered with a plain 401.
pub async fn login(
    State(state): State<Arc<crate::AppState>>,
    store: TokenStore,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, RelayError> {
    let Json(body) = payload?;
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(RelayError::Validation("Требуются email и пароль".into()));
    }

    let result = state.upstream.login(&body).await?;

    if !result.ok() {
        audit::authentication_event(
            Activity::Logon,
            false,
            Some(&body.email),
            &format!("Upstream rejected login with {}", result.status),
        );
        return Err(result.into_relay_error());
    }

    let Some(token) = result.data.as_ref().and_then(extract_token) else {
        audit::authentication_event(
            Activity::Logon,
            false,
            Some(&body.email),
            "Upstream accepted login without issuing a token",
        );
        return Err(RelayError::Unauthenticated);
    };

    if !is_valid_cookie_value(&token) {
        tracing::error!("Upstream issued a token that cannot be stored in a cookie");
        return Err(UpstreamError::InvalidToken.into());
    }

    store.set_token(Some(token)).await;

    audit::authentication_event(Activity::Logon, true, Some(&body.email), "Login succeeded");

    Ok(Json(MessageResponse::new(LOGIN_SUCCESS_MESSAGE)))
}
