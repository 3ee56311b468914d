//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::api::{ApiError, UserDirectory, UserRecord};
use crate::identity::{ProviderError, TokenSource};
use crate::routes::Navigator;

// =============================================================================
// BACKEND
// =============================================================================

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_backend(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("test backend failed");
    });
    format!("http://{addr}")
}

#[must_use]
pub fn user(id: i64, email: &str) -> UserRecord {
    UserRecord { id, email: email.into(), firebase_uid: None, name: None, created_at: None }
}

// =============================================================================
// TOKENS
// =============================================================================

/// Hands out `tok-1`, `tok-2`, ... so tests can see a token was fetched per call.
#[derive(Default)]
pub struct CountingTokens {
    calls: AtomicUsize,
}

impl CountingTokens {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TokenSource for CountingTokens {
    async fn id_token(&self) -> Result<Option<String>, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(format!("tok-{n}")))
    }
}

pub struct NoTokens;

#[async_trait::async_trait]
impl TokenSource for NoTokens {
    async fn id_token(&self) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }
}

pub struct BrokenTokens;

#[async_trait::async_trait]
impl TokenSource for BrokenTokens {
    async fn id_token(&self) -> Result<Option<String>, ProviderError> {
        Err(ProviderError::Token("refresh rejected".into()))
    }
}

// =============================================================================
// USER DIRECTORY
// =============================================================================

type Reply = Result<Option<UserRecord>, ApiError>;

/// Directory whose answers are released by the test, one gate per call.
///
/// Each `fetch_user` registers a pending call keyed by provider id and waits
/// for the test to `release` it, so completion order is fully controlled.
#[derive(Default)]
pub struct GatedUsers {
    pending: Mutex<HashMap<String, Vec<oneshot::Sender<Reply>>>>,
    calls: Mutex<Vec<String>>,
    arrived: tokio::sync::Notify,
}

impl GatedUsers {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Wait until `count` fetches have started.
    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let notified = self.arrived.notified();
            if self.calls().len() >= count {
                return;
            }
            notified.await;
        }
    }

    /// Complete the oldest pending fetch for `provider_id`.
    pub fn release(&self, provider_id: &str, reply: Reply) {
        let tx = {
            let mut pending = self.pending.lock().expect("pending lock");
            let queue = pending.get_mut(provider_id).expect("no pending fetch for provider id");
            queue.remove(0)
        };
        let _ = tx.send(reply);
    }
}

#[async_trait::async_trait]
impl UserDirectory for GatedUsers {
    async fn fetch_user(&self, provider_id: &str) -> Result<Option<UserRecord>, ApiError> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("pending lock")
            .entry(provider_id.to_string())
            .or_default()
            .push(tx);
        self.calls.lock().expect("calls lock").push(provider_id.to_string());
        self.arrived.notify_waiters();
        rx.await
            .unwrap_or_else(|_| Err(ApiError::Request("gate dropped".into())))
    }
}

/// Directory answering immediately from a fixed map.
#[derive(Default)]
pub struct FixedUsers {
    users: HashMap<String, UserRecord>,
}

impl FixedUsers {
    #[must_use]
    pub fn with(mut self, provider_id: &str, record: UserRecord) -> Self {
        self.users.insert(provider_id.to_string(), record);
        self
    }
}

#[async_trait::async_trait]
impl UserDirectory for FixedUsers {
    async fn fetch_user(&self, provider_id: &str) -> Result<Option<UserRecord>, ApiError> {
        Ok(self.users.get(provider_id).cloned())
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Records every pushed path.
#[derive(Default)]
pub struct RecordingNavigator {
    pushed: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn pushed(&self) -> Vec<String> {
        self.pushed.lock().expect("pushed lock").clone()
    }
}

#[async_trait::async_trait]
impl Navigator for RecordingNavigator {
    async fn push(&self, path: &str) {
        self.pushed.lock().expect("pushed lock").push(path.to_string());
    }
}
