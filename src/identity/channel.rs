//! In-process identity provider driven by the host application.
//!
//! SYSTEM CONTEXT
//! ==============
//! Hosts that receive provider callbacks on their own (a webview bridge, a
//! CLI prompt, tests) push them here; subscribers see them as a stream.
//! Like hosted providers, a subscriber registered after the session was
//! confirmed immediately receives the current state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use futures::channel::mpsc;

use super::{IdentityEvent, IdentityProvider, IdentitySubscription, ProviderError, TokenSource};

#[derive(Debug, Clone)]
struct Identity {
    uid: String,
    token: String,
}

#[derive(Default)]
struct ProviderState {
    /// `None` until the session has been confirmed one way or the other.
    confirmed: Option<Option<Identity>>,
    subscribers: Vec<mpsc::UnboundedSender<IdentityEvent>>,
}

impl ProviderState {
    fn current_event(&self) -> Option<IdentityEvent> {
        self.confirmed.as_ref().map(|identity| match identity {
            Some(identity) => IdentityEvent::signed_in(identity.uid.clone()),
            None => IdentityEvent::SignedOut,
        })
    }

    fn broadcast(&mut self, event: &IdentityEvent) {
        self.subscribers
            .retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }
}

/// Identity provider backed by unbounded `futures` channels.
#[derive(Default)]
pub struct ChannelProvider {
    state: Mutex<ProviderState>,
}

impl ChannelProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Confirm a signed-in identity and notify subscribers.
    pub fn sign_in(&self, uid: impl Into<String>, token: impl Into<String>) {
        let identity = Identity { uid: uid.into(), token: token.into() };
        let event = IdentityEvent::signed_in(identity.uid.clone());
        let mut state = self.lock();
        state.confirmed = Some(Some(identity));
        state.broadcast(&event);
    }

    /// Confirm there is no session (startup with nothing stored, or expiry).
    pub fn confirm_signed_out(&self) {
        let mut state = self.lock();
        state.confirmed = Some(None);
        state.broadcast(&IdentityEvent::SignedOut);
    }

    /// Replace the current identity's token without emitting an event.
    /// Returns `false` when nobody is signed in.
    pub fn refresh_token(&self, token: impl Into<String>) -> bool {
        let mut state = self.lock();
        match state.confirmed.as_mut() {
            Some(Some(identity)) => {
                identity.token = token.into();
                true
            }
            _ => false,
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.lock();
        state.subscribers.retain(|tx| !tx.is_closed());
        state.subscribers.len()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for ChannelProvider {
    fn subscribe(&self) -> IdentitySubscription {
        let (tx, rx) = mpsc::unbounded();
        let mut state = self.lock();
        if let Some(event) = state.current_event() {
            // Receiver is alive here, send cannot fail.
            let _ = tx.unbounded_send(event);
        }
        state.subscribers.push(tx);
        rx.boxed()
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.confirm_signed_out();
        Ok(())
    }
}

#[async_trait::async_trait]
impl TokenSource for ChannelProvider {
    async fn id_token(&self) -> Result<Option<String>, ProviderError> {
        let state = self.lock();
        Ok(match &state.confirmed {
            Some(Some(identity)) => Some(identity.token.clone()),
            _ => None,
        })
    }
}

#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;
