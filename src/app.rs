//! Application wiring.
//!
//! DESIGN
//! ======
//! `AuthApp` builds the store, resolver, watcher, guard and sign-out
//! coordinator from one config, and registers the single provider
//! subscription. The store is created here and handed to everything else;
//! nothing reaches it as ambient global state.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::api::{ApiClient, ApiError, BackendUsers, UserDirectory};
use crate::config::AuthConfig;
use crate::identity::{IdentityProvider, TokenSource};
use crate::routes::{GuardDecision, NavigationGuard, Navigator, RouteTable};
use crate::services::{SignOutCoordinator, SignOutError, UserResolver, spawn_session_watcher};
use crate::state::{AuthSession, AuthStore};

pub struct AuthApp {
    store: AuthStore,
    guard: NavigationGuard,
    sign_out: SignOutCoordinator,
    navigator: Arc<dyn Navigator>,
    watcher: JoinHandle<()>,
}

impl AuthApp {
    /// Start against the backend named in `config`, authenticating requests
    /// with tokens from `provider`. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn start<P>(config: &AuthConfig, provider: Arc<P>, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError>
    where
        P: IdentityProvider + TokenSource + 'static,
    {
        let api = ApiClient::new(config.api_url.clone(), provider.clone(), config.timeouts)?;
        let users = Arc::new(BackendUsers::new(api, config.user_path.clone()));
        Ok(Self::start_with(config, provider, users, navigator))
    }

    /// Start with an explicit user directory.
    #[must_use]
    pub fn start_with(
        config: &AuthConfig,
        provider: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserDirectory>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let store = AuthStore::new();
        let resolver = UserResolver::new(store.clone(), users);
        let watcher = spawn_session_watcher(provider.subscribe(), resolver);

        let routes = RouteTable::standard(&config.sign_in_route, &config.landing_route);
        let guard = NavigationGuard::new(store.clone(), routes, &config.sign_in_route, &config.landing_route);
        let sign_out = SignOutCoordinator::new(
            provider,
            navigator.clone(),
            store.clone(),
            config.sign_out_policy,
            &config.sign_in_route,
        );

        Self { store, guard, sign_out, navigator, watcher }
    }

    #[must_use]
    pub fn store(&self) -> &AuthStore {
        &self.store
    }

    #[must_use]
    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    #[must_use]
    pub fn session(&self) -> AuthSession {
        self.store.snapshot()
    }

    /// Guard `target` and push the resulting destination.
    pub async fn navigate(&self, target: &str) -> GuardDecision {
        self.guard.go(self.navigator.as_ref(), target).await
    }

    /// # Errors
    ///
    /// Returns the provider's sign-out failure; see [`SignOutCoordinator::sign_out`].
    pub async fn sign_out(&self) -> Result<(), SignOutError> {
        self.sign_out.sign_out().await
    }
}

impl Drop for AuthApp {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
