//! POST /api/auth/logout

use axum::Json;

use crate::audit::{self, Activity};
use crate::session::TokenStore;
use crate::types::{LOGOUT_MESSAGE, MessageResponse};

/// Clear the session cookie. Always succeeds, with or without a session.
pub async fn logout(store: TokenStore) -> Json<MessageResponse> {
    let had_session = store.token().await.is_some();
    store.set_token(None).await;

    if had_session {
        audit::authentication_event(Activity::Logoff, true, None, "User logged out");
    }

    Json(MessageResponse::new(LOGOUT_MESSAGE))
}
