//! Background idle-session sweeper.

use super::manager::SessionManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawn a loop that calls [`SessionManager::sweep_expired`] on `interval`,
/// for as long as the returned handle (or the manager) is kept alive.
pub fn spawn(manager: Arc<SessionManager>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let removed = manager.sweep_expired();
            if removed > 0 {
                tracing::debug!(removed, "swept idle sessions");
            }
        }
    })
}
