//! Request-scoped token handling.
//!
//! The browser's cookie jar is the only durable home of the session token.
//! Each inbound request gets its own `TokenStore`, seeded from the cookie by
//! the token middleware; handlers mutate it, and the middleware turns the
//! mutation into a `Set-Cookie` on the way out.

pub mod cookie;
pub mod middleware;

use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct TokenState {
    token: Option<String>,
    modified: bool,
}

/// Holder of the bearer token for one inbound request.
///
/// Cloning shares the same request's state; separate requests never share
/// a store.
#[derive(Clone, Default)]
pub struct TokenStore {
    inner: Arc<Mutex<TokenState>>,
}

impl TokenStore {
    /// Store seeded from an inbound cookie value (unmodified).
    pub fn from_cookie(token: Option<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TokenState {
                token,
                modified: false,
            })),
        }
    }

    /// Set or clear the held token. `None` means unauthenticated.
    ///
    /// Setting the same value again still counts as a modification, which
    /// re-issues the cookie with a fresh TTL.
    pub async fn set_token(&self, token: Option<String>) {
        let mut state = self.inner.lock().await;
        state.token = token;
        state.modified = true;
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.lock().await.token.clone()
    }

    /// The token to persist, if a handler changed it during the request.
    ///
    /// `Some(Some(t))` re-issues the cookie, `Some(None)` clears it.
    pub async fn pending_change(&self) -> Option<Option<String>> {
        let state = self.inner.lock().await;
        state.modified.then(|| state.token.clone())
    }
}

// Token values are credentials: keep them out of `{:?}` output.
impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}
