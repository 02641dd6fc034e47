//! Session cookie contract.
//!
//! The token is stored as-is in `auth_token`, always `HttpOnly` and
//! `SameSite=Lax` with a two hour lifetime. The clearing cookie repeats the
//! exact attribute set, otherwise browsers keep the original.

pub const COOKIE_NAME: &str = "auth_token";
pub const MAX_AGE_SECS: u64 = 2 * 3600;

/// Attributes shared by the issuing and clearing cookie.
#[derive(Debug, Clone, Default)]
pub struct CookieSettings {
    pub secure: bool,
    pub domain: Option<String>,
}

impl CookieSettings {
    fn attributes(&self, max_age: u64) -> Vec<String> {
        let mut parts = vec!["HttpOnly".to_string()];
        if self.secure {
            parts.push("Secure".into());
        }
        parts.push("SameSite=Lax".into());
        parts.push(format!("Max-Age={max_age}"));
        parts.push("Path=/".into());
        if let Some(domain) = &self.domain {
            parts.push(format!("Domain={domain}"));
        }
        parts
    }
}

/// `Set-Cookie` value issuing the session token with a fresh TTL.
pub fn make_set_cookie(token: &str, settings: &CookieSettings) -> String {
    let mut parts = vec![format!("{COOKIE_NAME}={token}")];
    parts.extend(settings.attributes(MAX_AGE_SECS));
    parts.join("; ")
}

/// `Set-Cookie` value removing the session cookie.
pub fn make_clear_cookie(settings: &CookieSettings) -> String {
    let mut parts = vec![format!("{COOKIE_NAME}=")];
    parts.extend(settings.attributes(0));
    parts.join("; ")
}

/// Whether a token can be stored verbatim as a cookie value (RFC 6265
/// `cookie-octet`s only).
pub fn is_valid_cookie_value(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
        })
}

/// Parse a specific cookie from a Cookie header value.
pub fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let trimmed = part.trim();
        if let Some(value) = trimmed.strip_prefix(name)
            && let Some(value) = value.strip_prefix('=')
        {
            return Some(value);
        }
    }
    None
}
