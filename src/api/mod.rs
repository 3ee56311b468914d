//! Authenticated HTTP client for the backend API.
//!
//! DESIGN
//! ======
//! Every request asks the token source for a fresh identity token and attaches
//! it as `Authorization: Bearer <token>`. Tokens expire, so nothing here caches
//! one. Requests made while signed out go out without the header and the
//! backend decides.
//!
//! ERROR HANDLING
//! ==============
//! Transport, status and parse failures are distinct `ApiError` variants so
//! callers can log a precise code; none of them panic.

pub mod users;

use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiTimeouts;
use crate::error::ErrorCode;
use crate::identity::{ProviderError, TokenSource};

pub use users::{BackendUsers, UserDirectory, UserRecord};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// No bearer token could be obtained for the request.
    #[error("token unavailable: {0}")]
    Token(#[from] ProviderError),

    /// The HTTP request failed before a response arrived.
    #[error("API request failed: {0}")]
    Request(String),

    /// The backend returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    Response { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Parse(String),
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Token(_) => "E_API_TOKEN",
            Self::Request(_) => "E_API_REQUEST",
            Self::Response { .. } => "E_API_RESPONSE",
            Self::Parse(_) => "E_API_PARSE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Token(_) | Self::Request(_) | Self::Response { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Backend HTTP client that authenticates every request with a fresh token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    /// Build a client for `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>, timeouts: ApiTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into(), tokens })
    }

    /// `GET {base_url}{path}` and return the raw body text.
    ///
    /// # Errors
    ///
    /// Returns an error on token retrieval failure, transport failure, or a
    /// non-success status.
    pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(token) = self.tokens.id_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Response { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
