//! Background Cache Write
//!
//! Stores a response without holding up the request that produced it.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStorage, InterceptStats};

/// Spawns a task that writes `entry` into the `namespace`.
///
/// The caller does not wait for the write. A failed write (quota exceeded,
/// oversized body) is logged and counted, never propagated: the response it
/// belongs to has already been returned.
///
/// # Arguments
/// * `tracker` - Tracker the task is registered with, so shutdown can wait for it
/// * `storage` - Shared namespace store
/// * `stats` - Interceptor statistics to update
/// * `namespace` - Target namespace identifier
/// * `entry` - The response to store
///
/// # Example
/// ```ignore
/// spawn_cache_write(&tracker, storage.clone(), stats.clone(), ns, entry);
/// // Later, during shutdown:
/// tracker.close();
/// tracker.wait().await;
/// ```
pub fn spawn_cache_write(
    tracker: &TaskTracker,
    storage: Arc<dyn CacheStorage>,
    stats: Arc<RwLock<InterceptStats>>,
    namespace: String,
    entry: CacheEntry,
) -> JoinHandle<()> {
    tracker.spawn(async move {
        let url = entry.url.clone();
        match storage.put(&namespace, entry).await {
            Ok(()) => {
                debug!("Cached {} in {}", url, namespace);
                stats.write().await.record_write();
            }
            Err(err) => {
                warn!("Failed to cache {} in {}: {}", url, namespace, err);
                stats.write().await.record_write_failure();
            }
        }
    })
}
