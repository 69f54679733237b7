//! Expiry Sweep Task
//!
//! Background task that periodically drops expired entries from every
//! registered cache. Expired entries are already treated as misses on
//! access; the sweep only gives their memory back sooner.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheRegistry;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let sweeper = spawn_sweeper(state.registry.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper<K, V>(registry: Arc<CacheRegistry<K, V>>, interval: Duration) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            for name in registry.names() {
                let Some(cache) = registry.get(&name) else {
                    continue;
                };
                let removed = cache.purge_expired();
                if removed > 0 {
                    info!(cache = %name, removed, "Expiry sweep removed entries");
                } else {
                    debug!(cache = %name, "Expiry sweep found nothing");
                }
            }
        }
    })
}
