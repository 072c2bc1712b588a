//! Background purge of expired sessions.

use std::time::Duration;

use tokio::sync::broadcast;

use crate::session::SessionStore;

/// Purge expired sessions every `interval` until shutdown is signalled.
pub async fn run_sweeper(store: SessionStore, interval: Duration, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = store.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, remaining = store.len(), "Purged expired sessions");
                }
            }
            _ = shutdown.recv() => {
                tracing::debug!("Session sweeper stopping");
                return;
            }
        }
    }
}
