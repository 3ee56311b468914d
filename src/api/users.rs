//! Backend user lookup by provider identity.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::config::UID_PLACEHOLDER;

/// Application user profile owned by the backend. Held read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub firebase_uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Creation timestamp exactly as the backend formats it.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Lookup of the application user for a confirmed provider identity.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` means the backend has no record for this identity.
    async fn fetch_user(&self, provider_id: &str) -> Result<Option<UserRecord>, ApiError>;
}

/// `UserDirectory` backed by the authenticated API client.
#[derive(Clone)]
pub struct BackendUsers {
    api: ApiClient,
    path_template: String,
}

impl BackendUsers {
    #[must_use]
    pub fn new(api: ApiClient, path_template: impl Into<String>) -> Self {
        Self { api, path_template: path_template.into() }
    }

    fn path_for(&self, provider_id: &str) -> String {
        self.path_template
            .replace(UID_PLACEHOLDER, &urlencoding::encode(provider_id))
    }
}

#[async_trait::async_trait]
impl UserDirectory for BackendUsers {
    async fn fetch_user(&self, provider_id: &str) -> Result<Option<UserRecord>, ApiError> {
        let body = self.api.get_text(&self.path_for(provider_id)).await?;
        parse_user_record(&body)
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a lookup response. The backend answers `null` for unknown users.
pub(crate) fn parse_user_record(json: &str) -> Result<Option<UserRecord>, ApiError> {
    serde_json::from_str::<Option<UserRecord>>(json).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
