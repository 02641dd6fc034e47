//! Upstream HTTP client: login, refresh, profile, and generic forwarding.
//!
//! Non-2xx answers are not errors here; they come back as an
//! `UpstreamResponse` for the caller to inspect. Only transport faults and
//! unreadable bodies are `UpstreamError`s.

use axum::http::header::{self, HeaderMap, HeaderValue};
use serde_json::Value;

use super::{ForwardRequest, UpstreamError, UpstreamResponse};
use crate::config::Config;
use crate::error::clamp_status;
use crate::types::LoginRequest;

/// Shared, read-only client for the upstream API.
///
/// Holds no token: every authenticated call takes it as an argument.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: Config,
}

impl UpstreamClient {
    /// Build the client; its timeout is the only timeout the relay applies.
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| UpstreamError::RequestFailed(e.to_string()))?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn url(&self, base: &str, path_and_query: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), path_and_query)
    }

    /// POST credentials to the upstream login endpoint.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url(&self.config.upstream_base_url, &self.config.upstream_login_path);
        let request = self.http.post(url).json(credentials);
        send(request).await
    }

    /// POST to the upstream refresh endpoint with the current token.
    pub async fn refresh(&self, token: &str) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url(&self.config.upstream_base_url, &self.config.upstream_refresh_path);
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, bearer(token)?);
        send(self.http.post(url).headers(headers)).await
    }

    /// Fetch the user's profile; `None` on any non-2xx answer.
    pub async fn get_profile(&self, token: &str) -> Result<Option<Value>, UpstreamError> {
        let url = self.url(&self.config.upstream_base_url, &self.config.upstream_profile_path);
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, bearer(token)?);

        let response = send(self.http.get(url).headers(headers)).await?;
        if !response.ok() {
            tracing::debug!(status = %response.status, "Upstream refused profile request");
            return Ok(None);
        }
        Ok(Some(response.data.unwrap_or(Value::Null)))
    }

    /// Issue a proxied call, attaching the bearer token when there is one.
    ///
    /// The upstream's status and body come back untouched.
    pub async fn forward(
        &self,
        request: ForwardRequest,
        token: Option<&str>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let base = self.config.upstream_base_for(request.service_id.as_deref());
        let url = self.url(base, &request.path_and_query());

        let mut headers = request.headers.clone();
        if let Some(token) = token {
            headers.insert(header::AUTHORIZATION, bearer(token)?);
        }

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(headers);
        if let Some(body) = request.outbound_body() {
            builder = builder.body(body.clone());
        }

        let response = send(builder).await?;
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            service_id = request.service_id.as_deref().unwrap_or("-"),
            status = %response.status,
            "Forwarded request"
        );
        Ok(response)
    }
}

fn bearer(token: &str) -> Result<HeaderValue, UpstreamError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| UpstreamError::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}

async fn send(request: reqwest::RequestBuilder) -> Result<UpstreamResponse, UpstreamError> {
    let resp = request.send().await.map_err(transport_error)?;

    // Capture status before consuming the body
    let status = clamp_status(resp.status().as_u16());
    let bytes = resp.bytes().await.map_err(transport_error)?;

    let data = if bytes.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(
            serde_json::from_slice(&bytes)
                .map_err(|e| UpstreamError::InvalidBody(e.to_string()))?,
        )
    };

    Ok(UpstreamResponse { status, data })
}

fn transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::RequestFailed(err.to_string())
    }
}
