//! GET /api/auth/me

use axum::Json;

use crate::error::RelayError;
use crate::session::TokenStore;
use crate::types::WhoamiResponse;

/// Echo the cookie token back to the SPA for self-checks.
///
/// Diagnostic only: nothing in the relay authorizes on this.
pub async fn me(store: TokenStore) -> Result<Json<WhoamiResponse>, RelayError> {
    let token = store.token().await.ok_or(RelayError::Unauthenticated)?;
    Ok(Json(WhoamiResponse { token }))
}
