//! Periodic Refresh Task
//!
//! The caches never refresh themselves; the server binary drives them from
//! this task so that TTL-bound snapshots stay populated.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::Refreshable;

/// Spawns a task that refreshes every cache in `caches` once per interval.
///
/// Each refresh runs on the blocking pool because it holds the cache's write
/// lock for the whole loader call. Failures are logged and retried on the
/// next tick.
///
/// # Example
/// ```ignore
/// let handle = spawn_refresh_task(state.refreshables(), 30);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_refresh_task(
    caches: Vec<Arc<dyn Refreshable>>,
    refresh_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(refresh_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting refresh task for {} caches with interval of {} seconds",
            caches.len(),
            refresh_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            for cache in &caches {
                let target = Arc::clone(cache);
                let outcome = tokio::task::spawn_blocking(move || target.refresh()).await;

                match outcome {
                    Ok(Ok(())) => debug!("Periodic refresh of '{}' succeeded", cache.name()),
                    Ok(Err(err)) => warn!("Periodic refresh of '{}' failed: {}", cache.name(), err),
                    Err(err) => warn!("Refresh worker for '{}' panicked: {}", cache.name(), err),
                }
            }
        }
    })
}
