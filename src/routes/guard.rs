//! Navigation guard.
//!
//! DESIGN
//! ======
//! Each navigation is `PENDING -> {ALLOWED, REDIRECTED}`. While the auth store
//! is still loading, the guard parks the navigation on the store's one-shot
//! settle signal; it never renders and never redirects in that window. After
//! settle, decisions are a pure function of the intent and the session, so
//! repeating one on unchanged inputs gives the same answer.
//!
//! TRADE-OFFS
//! ==========
//! A provider that never reports leaves every navigation parked. That is the
//! deny-by-default choice: a permanent loading view beats rendering a
//! protected page on guesswork. A navigation parked longer than
//! [`DEFAULT_STALL_WARNING`] logs one warning per guard and raises
//! [`NavigationGuard::stalled`]; it keeps waiting either way.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{info, warn};

use super::{Navigator, Route, RouteIntent, RouteTable};
use crate::state::{AuthSession, AuthStore};

/// Outcome of guarding one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed,
    Redirected { to: String },
}

impl GuardDecision {
    /// Where the host should end up for `intent`.
    #[must_use]
    pub fn destination<'a>(&'a self, intent: &'a RouteIntent) -> &'a str {
        match self {
            Self::Allowed => &intent.target,
            Self::Redirected { to } => to,
        }
    }
}

/// How long a navigation may stay parked before the silent provider is reported.
pub const DEFAULT_STALL_WARNING: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct NavigationGuard {
    store: AuthStore,
    routes: RouteTable,
    sign_in: Route,
    landing_route: String,
    stall_warning: Duration,
    stalled: Arc<AtomicBool>,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(store: AuthStore, routes: RouteTable, sign_in_route: impl Into<String>, landing_route: impl Into<String>) -> Self {
        Self {
            store,
            routes,
            sign_in: Route::public(sign_in_route),
            landing_route: landing_route.into(),
            stall_warning: DEFAULT_STALL_WARNING,
            stalled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_stall_warning(mut self, after: Duration) -> Self {
        self.stall_warning = after;
        self
    }

    /// Whether some navigation has waited past the stall threshold for the
    /// first auth settle.
    #[must_use]
    pub fn stalled(&self) -> bool {
        self.stalled.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decide `intent` against a settled `session`.
    #[must_use]
    pub fn decide(&self, intent: &RouteIntent, session: &AuthSession) -> GuardDecision {
        if intent.requires_auth && !session.is_authenticated {
            return GuardDecision::Redirected { to: self.sign_in.pattern.clone() };
        }
        if session.is_authenticated && self.sign_in.matches(intent.path()) {
            return GuardDecision::Redirected { to: self.landing_route.clone() };
        }
        GuardDecision::Allowed
    }

    /// Decide without waiting. `None` while the store is still loading.
    #[must_use]
    pub fn evaluate(&self, intent: &RouteIntent) -> Option<GuardDecision> {
        let session = self.store.snapshot();
        session
            .is_settled()
            .then(|| self.decide(intent, &session))
    }

    /// Decide `intent`, suspending until the store settles if it has not yet.
    pub async fn admit(&self, intent: &RouteIntent) -> GuardDecision {
        let decision = match self.evaluate(intent) {
            Some(decision) => decision,
            None => {
                info!(route = %intent.target, "navigation parked until auth settles");
                let session = self.parked(intent).await;
                self.decide(intent, &session)
            }
        };
        match &decision {
            GuardDecision::Allowed => info!(route = %intent.target, "navigation allowed"),
            GuardDecision::Redirected { to } => info!(route = %intent.target, %to, "navigation redirected"),
        }
        decision
    }

    async fn parked(&self, intent: &RouteIntent) -> AuthSession {
        if let Ok(session) = tokio::time::timeout(self.stall_warning, self.store.wait_settled()).await {
            return session;
        }
        if !self.stalled.swap(true, Ordering::Relaxed) {
            warn!(
                route = %intent.target,
                waited_ms = u64::try_from(self.stall_warning.as_millis()).unwrap_or(u64::MAX),
                "no identity event from provider yet; navigation still parked"
            );
        }
        self.store.wait_settled().await
    }

    /// Resolve `target` through the route table and admit it.
    pub async fn navigate(&self, target: &str) -> GuardDecision {
        let intent = self.routes.intent(target);
        self.admit(&intent).await
    }

    /// Admit `target` and push wherever the decision lands on `navigator`.
    pub async fn go(&self, navigator: &dyn Navigator, target: &str) -> GuardDecision {
        let intent = self.routes.intent(target);
        let decision = self.admit(&intent).await;
        navigator.push(decision.destination(&intent)).await;
        decision
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
