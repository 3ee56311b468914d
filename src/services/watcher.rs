//! Identity session watcher.
//!
//! Owns the one long-lived provider subscription and hands every event to the
//! resolver as it arrives. It never buffers and never fails; if the provider
//! stream ends, the session stays wherever it was (possibly still loading).

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::resolver::UserResolver;
use crate::identity::IdentitySubscription;

/// Spawn the watcher loop over `subscription`. Returns a handle for shutdown.
pub fn spawn_session_watcher(mut subscription: IdentitySubscription, resolver: UserResolver) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut received: u64 = 0;
        while let Some(event) = subscription.next().await {
            received += 1;
            debug!(received, present = event.is_present(), "identity event");
            // Not awaited; the store's ticket check orders completions.
            let _resolution = resolver.dispatch(event);
        }
        warn!(received, "identity subscription ended; auth session will no longer update");
    })
}

#[cfg(test)]
#[path = "watcher_test.rs"]
mod tests;
