//! POST /api/auth/GetProfileInfo

use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::error::RelayError;
use crate::session::TokenStore;
use crate::types::ProfileResponse;

/// Return the upstream profile for the session's token.
pub async fn get_profile_info(
    State(state): State<Arc<crate::AppState>>,
    store: TokenStore,
) -> Result<Json<ProfileResponse>, RelayError> {
    let token = store.token().await.ok_or(RelayError::Unauthenticated)?;

    match state.upstream.get_profile(&token).await? {
        Some(user) => Ok(Json(ProfileResponse { user })),
        None => Err(RelayError::Unauthenticated),
    }
}
