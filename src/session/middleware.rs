//! Axum token middleware.
//!
//! Reads the `auth_token` cookie into a fresh `TokenStore`, makes it
//! available via request extensions, and after the handler returns turns
//! any change to the store into a `Set-Cookie` header.

use axum::extract::{FromRequestParts, Request};
use axum::http::header::{self, HeaderValue};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use super::TokenStore;
use super::cookie::{COOKIE_NAME, CookieSettings, make_clear_cookie, make_set_cookie, parse_cookie};
use crate::error::RelayError;

/// Extract the request's TokenStore (put there by the token middleware).
impl<S> FromRequestParts<S> for TokenStore
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenStore>()
            .cloned()
            .ok_or(RelayError::Internal(
                "Token middleware not configured".into(),
            ))
    }
}

/// Token from the inbound `Cookie` headers, if any. Blank values count as absent.
pub fn token_from_request(req: &Request) -> Option<String> {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|h| parse_cookie(h, COOKIE_NAME))
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Axum middleware function scoping a TokenStore to one request.
pub async fn token_middleware(
    settings: Arc<CookieSettings>,
    mut req: Request,
    next: Next,
) -> Response {
    let store = TokenStore::from_cookie(token_from_request(&req));
    req.extensions_mut().insert(store.clone());

    let mut response = next.run(req).await;

    let cookie = match store.pending_change().await {
        None => return response,
        Some(Some(token)) => make_set_cookie(&token, &settings),
        Some(None) => make_clear_cookie(&settings),
    };

    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        // Handlers only store cookie-safe tokens, so this means a bad COOKIE_DOMAIN.
        Err(_) => tracing::error!("Session cookie could not be encoded as a header"),
    }

    response
}
