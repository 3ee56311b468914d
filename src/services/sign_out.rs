//! Sign-out coordinator.
//!
//! The provider is the source of truth for session transitions: under
//! `AwaitProvider` we only ask it to sign out and then navigate, and the
//! resulting `SignedOut` event settles the store through the resolver. Under
//! `ClearImmediately` the store is cleared as soon as the provider returns,
//! so protected content disappears before that event round-trips.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::SignOutPolicy;
use crate::error::ErrorCode;
use crate::identity::{IdentityProvider, ProviderError};
use crate::routes::Navigator;
use crate::state::AuthStore;

#[derive(Debug, thiserror::Error)]
pub enum SignOutError {
    /// The provider failed to clear its session; nothing was navigated.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ErrorCode for SignOutError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Provider(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Provider(e) => e.retryable(),
        }
    }
}

#[derive(Clone)]
pub struct SignOutCoordinator {
    provider: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    store: AuthStore,
    policy: SignOutPolicy,
    entry_route: String,
}

impl SignOutCoordinator {
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        navigator: Arc<dyn Navigator>,
        store: AuthStore,
        policy: SignOutPolicy,
        entry_route: impl Into<String>,
    ) -> Self {
        Self { provider, navigator, store, policy, entry_route: entry_route.into() }
    }

    /// Sign out with the provider, then force navigation to the entry route.
    ///
    /// # Errors
    ///
    /// Returns the provider's failure unchanged. The store is not touched
    /// and no navigation happens on that path, so the caller can retry.
    pub async fn sign_out(&self) -> Result<(), SignOutError> {
        if let Err(e) = self.provider.sign_out().await {
            warn!(error = %e, error_code = e.error_code(), "provider sign-out failed");
            return Err(e.into());
        }
        if self.policy == SignOutPolicy::ClearImmediately {
            self.store.clear();
        }
        self.navigator.push(&self.entry_route).await;
        info!(policy = ?self.policy, entry_route = %self.entry_route, "signed out");
        Ok(())
    }
}

#[cfg(test)]
#[path = "sign_out_test.rs"]
mod tests;
