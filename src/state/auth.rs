//! Auth-session state for the current process.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the navigation guard and user-aware callers; written only by the
//! user resolver and the sign-out coordinator.
//!
//! DESIGN
//! ======
//! The session and the single-flight sequence counter live together inside
//! one `tokio::sync::watch` sender. Every mutation runs in `send_if_modified`,
//! so the "is this still the latest request?" check and the write happen in
//! one critical section, and readers are woken only when the session changes.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::api::UserRecord;

/// Merged authentication state.
///
/// While `loading` is true the other two fields carry no meaning. Once
/// `loading` is false it stays false.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    pub loading: bool,
    pub is_authenticated: bool,
    pub current_user: Option<UserRecord>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self { loading: true, is_authenticated: false, current_user: None }
    }
}

impl AuthSession {
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

/// Sequence number handed to each resolution. Only the latest may settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct StoreState {
    session: AuthSession,
    issued: u64,
}

/// Single-writer store for the process-wide `AuthSession`.
///
/// Clone is cheap; all clones share one state.
#[derive(Clone)]
pub struct AuthStore {
    tx: Arc<watch::Sender<StoreState>>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StoreState::default());
        Self { tx: Arc::new(tx) }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Current session, copied out.
    #[must_use]
    pub fn snapshot(&self) -> AuthSession {
        self.tx.borrow().session.clone()
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.tx.borrow().session.is_settled()
    }

    /// Most recently issued ticket sequence; 0 before the first event.
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.tx.borrow().issued
    }

    /// Receiver that wakes on every session change.
    #[must_use]
    pub fn subscribe(&self) -> SessionWatch {
        SessionWatch { rx: self.tx.subscribe() }
    }

    /// Wait for the one-time `loading` latch to flip, then return the session.
    ///
    /// Returns without suspending if the session already settled.
    pub async fn wait_settled(&self) -> AuthSession {
        let mut rx = self.tx.subscribe();
        let session = match rx.wait_for(|state| state.session.is_settled()).await {
            Ok(state) => state.session.clone(),
            // The sender lives in `self`, so it cannot be gone while we borrow it.
            Err(_) => self.snapshot(),
        };
        session
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Issue the next ticket. Any earlier ticket becomes stale.
    pub(crate) fn issue(&self) -> Ticket {
        let mut issued = 0;
        self.tx.send_if_modified(|state| {
            state.issued += 1;
            issued = state.issued;
            false
        });
        Ticket(issued)
    }

    /// Record a final result for `ticket` and latch `loading` off.
    ///
    /// Returns `false` (and changes nothing) if a newer ticket was issued.
    pub(crate) fn settle(&self, ticket: Ticket, is_authenticated: bool, user: Option<UserRecord>) -> bool {
        let mut latest = 0;
        let applied = self.tx.send_if_modified(|state| {
            latest = state.issued;
            if state.issued != ticket.0 {
                return false;
            }
            state.session = AuthSession { loading: false, is_authenticated, current_user: user };
            true
        });
        if !applied {
            debug!(seq = ticket.0, latest, "stale resolution discarded");
        }
        applied
    }

    /// Drop the cached identity without touching `loading`.
    ///
    /// Also invalidates any resolution still in flight, so a fetch started
    /// before the clear cannot restore the old user.
    pub(crate) fn clear(&self) {
        self.tx.send_if_modified(|state| {
            state.issued += 1;
            let changed = state.session.is_authenticated || state.session.current_user.is_some();
            state.session.is_authenticated = false;
            state.session.current_user = None;
            changed
        });
    }
}

/// Change notifications for the session.
pub struct SessionWatch {
    rx: watch::Receiver<StoreState>,
}

impl SessionWatch {
    /// Session as of the last observed change.
    #[must_use]
    pub fn current(&mut self) -> AuthSession {
        self.rx.borrow_and_update().session.clone()
    }

    /// Wait for the next change. Returns `None` once the store is dropped.
    pub async fn changed(&mut self) -> Option<AuthSession> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
