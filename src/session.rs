use axum::{
    extract::{FromRef, FromRequestParts},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{self, InvalidHeaderValue},
        request::Parts,
    },
};

use crate::{config::AppConfig, gate::Role, models::UserInfo};

/// parse_cookie
///
/// Looks `name` up across every `Cookie` header on the request. The first matching pair wins.
/// Headers are read as lossy UTF-8 so one pair with stray bytes cannot hide its neighbours.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .find_map(|raw| {
            raw.split(';')
                .filter_map(|pair| pair.trim().split_once('='))
                .find(|(key, _)| key.trim() == name)
                .map(|(_, value)| unquote(value.trim()).to_string())
        })
}

/// Strips one pair of surrounding double quotes, which RFC 6265 allows around a value.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
}

/// is_cookie_value
///
/// True when `value` is non-empty and made only of RFC 6265 cookie-octets, so it can be
/// written into a `Set-Cookie` header and read back unchanged.
pub fn is_cookie_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

impl UserInfo {
    /// from_cookie_value
    ///
    /// URL-decodes and parses the user-info cookie. Anything that does not decode into a
    /// record (bad escapes, invalid JSON, a non-object document, a non-string role) yields
    /// the empty record.
    pub fn from_cookie_value(raw: &str) -> Self {
        let decoded = match urlencoding::decode(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!("user-info cookie is not valid percent-encoding: {}", e);
                return Self::default();
            }
        };

        serde_json::from_str(&decoded).unwrap_or_else(|e| {
            tracing::debug!("user-info cookie is not a valid record: {}", e);
            Self::default()
        })
    }

    pub fn to_cookie_value(&self) -> String {
        // Serializing a struct of optional strings cannot fail.
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        urlencoding::encode(&json).into_owned()
    }
}

/// SessionEvidence
///
/// The session state a request carries in its cookies. Read-only: nothing here writes back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionEvidence {
    token: Option<String>,
    pub user_info: UserInfo,
}

impl SessionEvidence {
    pub fn new(token: Option<String>, user_info: UserInfo) -> Self {
        Self { token, user_info }
    }

    pub fn from_headers(headers: &HeaderMap, config: &AppConfig) -> Self {
        let token = parse_cookie(headers, &config.token_cookie);
        let user_info = parse_cookie(headers, &config.user_info_cookie)
            .map(|raw| UserInfo::from_cookie_value(&raw))
            .unwrap_or_default();

        Self { token, user_info }
    }

    /// The bearer token, treating an empty cookie as no cookie.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn role(&self) -> Role {
        self.user_info.role()
    }
}

// --- Cookie Builders ---

pub fn set_cookie(
    name: &str,
    value: &str,
    config: &AppConfig,
    http_only: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; SameSite=Lax; Max-Age={}",
        name, value, config.session_max_age_secs
    );
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if config.secure_cookies() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn clear_cookie(name: &str, config: &AppConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{}=; Path=/; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        name
    );
    if config.secure_cookies() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

// --- Extractor ---

/// AuthSession
///
/// The session of a signed-in visitor, for handlers that call the backend on their behalf.
/// The gate has already routed the request by role; this extractor only insists on a token.
///
/// Rejection: `401 Unauthorized` when the token cookie is missing or empty.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_info: UserInfo,
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        let evidence = SessionEvidence::from_headers(&parts.headers, &config);

        let token = evidence
            .token()
            .ok_or(StatusCode::UNAUTHORIZED)?
            .to_string();

        Ok(AuthSession {
            token,
            user_info: evidence.user_info,
        })
    }
}
