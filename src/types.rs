//! Shared request/response DTOs and the fixed messages shown to the SPA.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Успешный вход";
pub const REFRESH_SUCCESS_MESSAGE: &str = "Токен обновлен";
pub const LOGOUT_MESSAGE: &str = "Выход выполнен";
pub const UNAUTHENTICATED_MESSAGE: &str = "Не авторизован";
pub const SERVER_ERROR_MESSAGE: &str = "Ошибка сервера";
pub const INVALID_BODY_MESSAGE: &str = "Некорректное тело запроса";

/// POST /api/auth/login request body.
///
/// Missing fields deserialize as empty strings so the handler can answer
/// with a validation error instead of a bare extractor rejection.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of every `{message}` style response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// POST /api/auth/GetProfileInfo response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: Value,
}

/// GET /api/auth/me response.
#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub token: String,
}

/// GET /health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub mode: String,
}

/// Pull the token out of an upstream login/refresh body.
///
/// Accepts `Token` (the upstream's casing) and `token`; blank values count
/// as missing.
pub fn extract_token(data: &Value) -> Option<String> {
    ["Token", "token"]
        .iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(String::from)
}
