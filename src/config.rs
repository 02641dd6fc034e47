//! Application configuration via environment variables.
//!
//! Read once at startup and shared read-only through `AppState`.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_base_url: String,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub api_prefix: String,
    pub cookie_secure: bool,
    pub cookie_domain: Option<String>,
    pub upstream_login_path: String,
    pub upstream_refresh_path: String,
    pub upstream_profile_path: String,
    pub upstream_timeout: Duration,
    /// `x-service-id` value -> upstream base URL.
    pub service_routes: HashMap<String, String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `UPSTREAM_BASE_URL`. Everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream_base_url = lookup("UPSTREAM_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnv("UPSTREAM_BASE_URL".into()))?;

        let port = match lookup("PORT") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT".into(), v))?,
            None => 3001,
        };

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .map_err(|_| ConfigError::Invalid("UPSTREAM_TIMEOUT_SECS".into(), v))?,
            ),
            None => Duration::from_secs(30),
        };

        let service_routes = match lookup("SERVICE_ROUTES") {
            Some(v) => parse_service_routes(&v)?,
            None => HashMap::new(),
        };

        let api_prefix = lookup("API_PATH_PREFIX").unwrap_or_else(|| "/api".into());
        let api_prefix = api_prefix.trim().trim_end_matches('/').to_string();
        if !api_prefix.starts_with('/') {
            return Err(ConfigError::Invalid("API_PATH_PREFIX".into(), api_prefix));
        }

        Ok(Self {
            upstream_base_url: trim_base(&upstream_base_url),
            port,
            frontend_origins: lookup("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".into())
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            api_prefix,
            cookie_secure: lookup("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1" || v == "True")
                .unwrap_or(true),
            cookie_domain: lookup("COOKIE_DOMAIN").filter(|v| !v.is_empty()),
            upstream_login_path: lookup("UPSTREAM_LOGIN_PATH")
                .unwrap_or_else(|| "/Auth/Login".into()),
            upstream_refresh_path: lookup("UPSTREAM_REFRESH_PATH")
                .unwrap_or_else(|| "/Auth/RefreshToken".into()),
            upstream_profile_path: lookup("UPSTREAM_PROFILE_PATH")
                .unwrap_or_else(|| "/Auth/GetProfileInfo".into()),
            upstream_timeout,
            service_routes,
        })
    }

    /// Upstream base URL for a service id, falling back to the default base.
    pub fn upstream_base_for(&self, service_id: Option<&str>) -> &str {
        service_id
            .and_then(|id| self.service_routes.get(id))
            .map(String::as_str)
            .unwrap_or(self.upstream_base_url.as_str())
    }
}

/// Configuration for testing — all fields settable directly.
impl Config {
    pub fn test_default() -> Self {
        Self {
            upstream_base_url: "http://127.0.0.1:9".into(),
            port: 3001,
            frontend_origins: vec!["http://localhost:3000".into()],
            api_prefix: "/api".into(),
            cookie_secure: true,
            cookie_domain: None,
            upstream_login_path: "/Auth/Login".into(),
            upstream_refresh_path: "/Auth/RefreshToken".into(),
            upstream_profile_path: "/Auth/GetProfileInfo".into(),
            upstream_timeout: Duration::from_secs(5),
            service_routes: HashMap::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("invalid value for {0}: {1:?}")]
    Invalid(String, String),
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Parse `id=url;id=url` into a routing table.
fn parse_service_routes(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut routes = HashMap::new();
    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (id, url) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::Invalid("SERVICE_ROUTES".into(), entry.into()))?;
        let (id, url) = (id.trim(), url.trim());
        if id.is_empty() || url.is_empty() {
            return Err(ConfigError::Invalid("SERVICE_ROUTES".into(), entry.into()));
        }
        routes.insert(id.to_string(), trim_base(url));
    }
    Ok(routes)
}
