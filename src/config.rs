//! Auth configuration parsed from environment variables.

use crate::error::ErrorCode;

pub const DEFAULT_USER_PATH: &str = "/users/firebase-uid/{uid}";
pub const DEFAULT_SIGN_IN_ROUTE: &str = "/sign-in";
pub const DEFAULT_LANDING_ROUTE: &str = "/dashboard";
pub const DEFAULT_API_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Placeholder in the user lookup path replaced by the provider's user id.
pub const UID_PLACEHOLDER: &str = "{uid}";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required env var {var}")]
    Missing { var: String },

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "E_CONFIG_MISSING",
            Self::Parse(_) => "E_CONFIG_PARSE",
        }
    }
}

/// What the sign-out coordinator does with the store while the provider's
/// `SignedOut` event is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignOutPolicy {
    /// Leave the store alone; the provider event settles it.
    #[default]
    AwaitProvider,
    /// Clear the store as soon as provider sign-out returns.
    ClearImmediately,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ApiTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_API_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_API_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub api_url: String,
    pub user_path: String,
    pub sign_in_route: String,
    pub landing_route: String,
    pub sign_out_policy: SignOutPolicy,
    pub timeouts: ApiTimeouts,
}

impl AuthConfig {
    /// Config with defaults for everything except the backend base URL.
    #[must_use]
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: normalize_base_url(api_url),
            user_path: DEFAULT_USER_PATH.to_string(),
            sign_in_route: DEFAULT_SIGN_IN_ROUTE.to_string(),
            landing_route: DEFAULT_LANDING_ROUTE.to_string(),
            sign_out_policy: SignOutPolicy::default(),
            timeouts: ApiTimeouts::default(),
        }
    }

    /// Build typed auth config from environment variables.
    ///
    /// Required:
    /// - `API_URL`: backend base URL
    ///
    /// Optional:
    /// - `AUTH_USER_PATH`: lookup path template containing `{uid}`
    /// - `AUTH_SIGN_IN_ROUTE`: default `/sign-in`
    /// - `AUTH_LANDING_ROUTE`: default `/dashboard`
    /// - `AUTH_SIGN_OUT_POLICY`: `await_provider` (default) or `clear_immediately`
    /// - `API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `API_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `API_URL` is missing or any value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("API_URL").map_err(|_| ConfigError::Missing { var: "API_URL".into() })?;
        let user_path = parse_user_path(std::env::var("AUTH_USER_PATH").ok().as_deref())?;
        let sign_in_route = parse_route(
            "AUTH_SIGN_IN_ROUTE",
            std::env::var("AUTH_SIGN_IN_ROUTE").ok().as_deref(),
            DEFAULT_SIGN_IN_ROUTE,
        )?;
        let landing_route = parse_route(
            "AUTH_LANDING_ROUTE",
            std::env::var("AUTH_LANDING_ROUTE").ok().as_deref(),
            DEFAULT_LANDING_ROUTE,
        )?;
        let sign_out_policy = parse_sign_out_policy(std::env::var("AUTH_SIGN_OUT_POLICY").ok().as_deref())?;
        let timeouts = ApiTimeouts {
            request_secs: parse_timeout_secs(
                "API_REQUEST_TIMEOUT_SECS",
                std::env::var("API_REQUEST_TIMEOUT_SECS").ok().as_deref(),
                DEFAULT_API_REQUEST_TIMEOUT_SECS,
            )?,
            connect_secs: parse_timeout_secs(
                "API_CONNECT_TIMEOUT_SECS",
                std::env::var("API_CONNECT_TIMEOUT_SECS").ok().as_deref(),
                DEFAULT_API_CONNECT_TIMEOUT_SECS,
            )?,
        };

        Ok(Self { api_url: normalize_base_url(&api_url), user_path, sign_in_route, landing_route, sign_out_policy, timeouts })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Whole seconds, at least 1. Zero would fail every request immediately.
fn parse_timeout_secs(var: &str, raw: Option<&str>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Parse(format!("{var} must be at least 1 second"))),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::Parse(format!("{var} must be whole seconds: '{raw}' ({e})"))),
    }
}

fn parse_user_path(raw: Option<&str>) -> Result<String, ConfigError> {
    let path = raw.unwrap_or(DEFAULT_USER_PATH);
    if !path.starts_with('/') {
        return Err(ConfigError::Parse(format!("AUTH_USER_PATH must start with '/': {path}")));
    }
    if !path.contains(UID_PLACEHOLDER) {
        return Err(ConfigError::Parse(format!("AUTH_USER_PATH must contain {UID_PLACEHOLDER}: {path}")));
    }
    Ok(path.to_string())
}

fn parse_route(var: &str, raw: Option<&str>, default: &str) -> Result<String, ConfigError> {
    let route = raw.unwrap_or(default);
    if !route.starts_with('/') {
        return Err(ConfigError::Parse(format!("{var} must start with '/': {route}")));
    }
    Ok(route.to_string())
}

fn parse_sign_out_policy(raw: Option<&str>) -> Result<SignOutPolicy, ConfigError> {
    match raw.unwrap_or("await_provider") {
        "await_provider" => Ok(SignOutPolicy::AwaitProvider),
        "clear_immediately" => Ok(SignOutPolicy::ClearImmediately),
        other => Err(ConfigError::Parse(format!(
            "unsupported AUTH_SIGN_OUT_POLICY '{other}' (expected 'await_provider' or 'clear_immediately')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
