use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and never
/// mutated afterwards; handlers and the access gate pull it out of `AppState` via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and cookie hardening.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Base URL of the schoolnet-be REST API (no trailing slash).
    pub backend_url: String,
    // Per-request timeout applied to every backend call.
    pub backend_timeout_secs: u64,
    // Cookie carrying the opaque bearer token.
    pub token_cookie: String,
    // Cookie carrying the URL-encoded user-info JSON record.
    pub user_info_cookie: String,
    // Lifetime of both session cookies.
    pub session_max_age_secs: u64,
    // Directory served under `/public`.
    pub assets_dir: String,
}

/// Env
///
/// Defines the runtime context. `Production` switches on JSON logs, `Secure` cookies and the
/// mandatory backend URL.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/api";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TOKEN_COOKIE: &str = "token";
const DEFAULT_USER_INFO_COOKIE: &str = "user_info";
// One week.
const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;
const DEFAULT_ASSETS_DIR: &str = "public";

impl Default for AppConfig {
    /// Safe, non-panicking configuration for tests and local scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_timeout_secs: DEFAULT_BACKEND_TIMEOUT_SECS,
            token_cookie: DEFAULT_TOKEN_COOKIE.to_string(),
            user_info_cookie: DEFAULT_USER_INFO_COOKIE.to_string(),
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            assets_dir: DEFAULT_ASSETS_DIR.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables.
    ///
    /// # Panics
    /// Panics if `SCHOOLNET_BE_URL` is missing while `APP_ENV=production`. The server must not
    /// come up pointing at a localhost backend in production.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let backend_url = match env {
            Env::Production => env::var("SCHOOLNET_BE_URL")
                .expect("FATAL: SCHOOLNET_BE_URL must be set in production."),
            Env::Local => {
                env::var("SCHOOLNET_BE_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
            }
        };

        Self {
            env,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            backend_url: backend_url.trim_end_matches('/').to_string(),
            backend_timeout_secs: parse_var("BACKEND_TIMEOUT_SECS", DEFAULT_BACKEND_TIMEOUT_SECS),
            token_cookie: env::var("TOKEN_COOKIE")
                .unwrap_or_else(|_| DEFAULT_TOKEN_COOKIE.to_string()),
            user_info_cookie: env::var("USER_INFO_COOKIE")
                .unwrap_or_else(|_| DEFAULT_USER_INFO_COOKIE.to_string()),
            session_max_age_secs: parse_var("SESSION_MAX_AGE_SECS", DEFAULT_SESSION_MAX_AGE_SECS),
            assets_dir: env::var("ASSETS_DIR").unwrap_or_else(|_| DEFAULT_ASSETS_DIR.to_string()),
        }
    }

    /// Session cookies only carry `Secure` outside local development (plain-HTTP localhost).
    pub fn secure_cookies(&self) -> bool {
        self.env == Env::Production
    }
}

/// Numeric variables fall back to their default when unset or unparsable.
fn parse_var(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
