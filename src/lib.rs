//! Auth relay: a stateless proxy between a browser SPA and an upstream API.
//!
//! The upstream's bearer token lives only in an HTTP-only cookie. The relay
//! reads it per request, attaches it to upstream calls, and rotates the
//! cookie when the upstream issues a new token.

pub mod audit;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod types;
pub mod upstream;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::from_fn;
use axum::routing::{any, get, post};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::session::cookie::CookieSettings;
use crate::session::middleware::token_middleware;
use crate::upstream::{SERVICE_ID_HEADER, UpstreamClient};

/// Shared application state available to all route handlers.
///
/// Read-only after startup; nothing request-specific lives here.
pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: Config, upstream: UpstreamClient) -> Self {
        Self { config, upstream }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    // Credentialed CORS needs exact origins, never a wildcard.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            SERVICE_ID_HEADER,
        ])
        .allow_credentials(true)
}

/// Build the Axum router with all middleware and routes.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cookie_settings = Arc::new(CookieSettings {
        secure: state.config.cookie_secure,
        domain: state.config.cookie_domain.clone(),
    });

    let auth_routes = Router::new()
        .route("/login", post(routes::login::login))
        .route("/refresh", post(routes::refresh::refresh_token))
        .route("/GetProfileInfo", post(routes::profile::get_profile_info))
        .route("/logout", post(routes::logout::logout))
        .route("/me", get(routes::me::me));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .route("/proxy/{*rest}", any(routes::proxy::forward));

    let api_prefix = state.config.api_prefix.clone();

    Router::new()
        .route("/health", get(routes::health::health))
        .nest(&api_prefix, api_routes)
        .layer(from_fn(move |req, next| {
            let settings = cookie_settings.clone();
            token_middleware(settings, req, next)
        }))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
