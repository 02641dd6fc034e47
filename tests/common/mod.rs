//! Test utilities: app builder wired to a wiremock upstream, request and
//! cookie helpers.

#![allow(dead_code)]

use auth_relay::config::Config;
use auth_relay::upstream::UpstreamClient;
use auth_relay::{AppState, create_app};
use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;
use std::sync::Arc;

/// Build a test app whose upstream is `upstream_uri` (usually a MockServer).
pub fn build_test_app(upstream_uri: &str) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        upstream_base_url: upstream_uri.to_string(),
        ..Config::test_default()
    };
    build_test_app_with_config(config)
}

/// Build a test app with a custom Config.
pub fn build_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let upstream = UpstreamClient::new(&config).expect("failed to build upstream client");
    let state = Arc::new(AppState::new(config, upstream));
    let app = create_app(state.clone());
    (app, state)
}

/// Read a response body as JSON (`Null` when empty).
pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&body).unwrap()
}

/// Request with an optional `auth_token` cookie and no body.
pub fn request_with_token(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Cookie", format!("auth_token={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// JSON request with an optional `auth_token` cookie.
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Cookie", format!("auth_token={token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// All `Set-Cookie` values on a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(String::from)
        .collect()
}

/// The `auth_token` value carried by a response's `Set-Cookie`, if any.
/// A clearing cookie yields `Some("")`.
pub fn session_cookie_value(response: &Response<Body>) -> Option<String> {
    set_cookies(response).iter().find_map(|c| {
        c.split(';')
            .next()
            .and_then(|pair| pair.strip_prefix("auth_token="))
            .map(String::from)
    })
}
