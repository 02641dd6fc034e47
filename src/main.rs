//! Relay entrypoint: load config, build the router, serve.

use std::env;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use auth_relay::config::Config;
use auth_relay::upstream::UpstreamClient;
use auth_relay::{AppState, create_app};

#[tokio::main]
async fn main() {
    // Load .env for local dev
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    let config = Config::from_env().expect("Failed to load configuration");
    let upstream = UpstreamClient::new(&config).expect("Failed to build upstream client");

    tracing::info!(
        upstream = %config.upstream_base_url,
        services = config.service_routes.len(),
        "Relaying to upstream"
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(config, upstream));
    let app = create_app(state);

    tracing::info!("Starting relay on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
