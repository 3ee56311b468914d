//! Identity provider contract.
//!
//! DESIGN
//! ======
//! The provider pushes session changes; we model its callback registration as
//! a `futures` stream that never restarts. Token retrieval is a separate
//! `TokenSource` seam so the HTTP client depends on nothing but tokens.

pub mod channel;

use futures::stream::BoxStream;

use crate::error::ErrorCode;

pub use channel::ChannelProvider;

// =============================================================================
// EVENTS
// =============================================================================

/// One provider-reported session change. Consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// The provider confirmed a signed-in identity.
    SignedIn { provider_id: String },
    /// The provider confirmed there is no session.
    SignedOut,
}

impl IdentityEvent {
    #[must_use]
    pub fn signed_in(provider_id: impl Into<String>) -> Self {
        Self::SignedIn { provider_id: provider_id.into() }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }

    #[must_use]
    pub fn provider_id(&self) -> Option<&str> {
        match self {
            Self::SignedIn { provider_id } => Some(provider_id),
            Self::SignedOut => None,
        }
    }
}

/// Infinite, non-restartable sequence of session changes.
pub type IdentitySubscription = BoxStream<'static, IdentityEvent>;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider rejected or failed the sign-out call.
    #[error("provider sign-out failed: {0}")]
    SignOut(String),

    /// A token could not be retrieved for the current identity.
    #[error("provider token retrieval failed: {0}")]
    Token(String),
}

impl ErrorCode for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SignOut(_) => "E_PROVIDER_SIGN_OUT",
            Self::Token(_) => "E_PROVIDER_TOKEN",
        }
    }

    fn retryable(&self) -> bool {
        true
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// Session half of the identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a session-change subscription. Called once per process.
    fn subscribe(&self) -> IdentitySubscription;

    /// Clear the provider-side session. Returns once it is cleared.
    async fn sign_out(&self) -> Result<(), ProviderError>;
}

/// Token half of the identity provider, read by the HTTP client.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    /// Fresh bearer token for the current identity, `None` when signed out.
    async fn id_token(&self) -> Result<Option<String>, ProviderError>;
}
