//! Backend user resolver: identity event in, settled session out.
//!
//! DESIGN
//! ======
//! Every event takes a ticket from the store before any I/O starts, and the
//! result is applied with that ticket. If a newer event arrived in the
//! meantime the store refuses the stale result, so out-of-order fetch
//! completion can never leave an older identity's user in the session.
//! Losing fetches are not aborted; their answer is simply dropped.
//!
//! ERROR HANDLING
//! ==============
//! Lookup failures are logged with their error code and settle the session as
//! signed out for this cycle. Nothing propagates: the caller is the watcher
//! loop, which has nobody to report to.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{UserDirectory, UserRecord};
use crate::error::ErrorCode;
use crate::identity::IdentityEvent;
use crate::state::{AuthStore, Ticket};

/// Handle on one dispatched event.
pub enum Resolution {
    /// Signed-out events settle inline; carries whether the store accepted it.
    Settled(bool),
    /// A backend lookup is running.
    Pending(JoinHandle<bool>),
}

impl Resolution {
    /// Wait for the outcome. `true` if this event's result reached the store.
    #[cfg(test)]
    pub(crate) async fn finished(self) -> bool {
        match self {
            Self::Settled(applied) => applied,
            Self::Pending(handle) => handle.await.unwrap_or(false),
        }
    }
}

#[derive(Clone)]
pub struct UserResolver {
    store: AuthStore,
    users: Arc<dyn UserDirectory>,
}

impl UserResolver {
    #[must_use]
    pub fn new(store: AuthStore, users: Arc<dyn UserDirectory>) -> Self {
        Self { store, users }
    }

    /// Take a ticket for `event` and resolve it.
    ///
    /// Never blocks: a signed-in event spawns its lookup and returns at once,
    /// so the caller can hand over the next event while this one is in flight.
    pub fn dispatch(&self, event: IdentityEvent) -> Resolution {
        let ticket = self.store.issue();
        match event {
            IdentityEvent::SignedOut => Resolution::Settled(self.apply(ticket, false, None)),
            IdentityEvent::SignedIn { provider_id } => {
                let resolver = self.clone();
                Resolution::Pending(tokio::spawn(async move { resolver.resolve(ticket, &provider_id).await }))
            }
        }
    }

    async fn resolve(&self, ticket: Ticket, provider_id: &str) -> bool {
        let (is_authenticated, user) = match self.users.fetch_user(provider_id).await {
            Ok(Some(user)) => (true, Some(user)),
            Ok(None) => {
                warn!(seq = ticket.seq(), provider_id, "no backend user for identity");
                (true, None)
            }
            Err(e) => {
                warn!(
                    seq = ticket.seq(),
                    provider_id,
                    error = %e,
                    error_code = e.error_code(),
                    retryable = e.retryable(),
                    "backend user lookup failed; settling as signed out"
                );
                (false, None)
            }
        };
        self.apply(ticket, is_authenticated, user)
    }

    fn apply(&self, ticket: Ticket, is_authenticated: bool, user: Option<UserRecord>) -> bool {
        let user_id = user.as_ref().map(|u| u.id);
        let first = !self.store.is_settled();
        let applied = self.store.settle(ticket, is_authenticated, user);
        if applied {
            info!(seq = ticket.seq(), is_authenticated, ?user_id, first, "auth session settled");
        }
        applied
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
