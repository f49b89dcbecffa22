//! Cleanup Tasks
//!
//! Background loops that purge expired cache entries and old bulk operations.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::bulk::BulkOperationsService;
use crate::cache::CacheStore;

/// Spawns a task that calls `CacheStore::cleanup` every `interval_secs`.
///
/// The returned handle is aborted on shutdown.
pub fn spawn_cache_cleanup_task<V>(
    cache: Arc<RwLock<CacheStore<V>>>,
    interval_secs: u64,
) -> JoinHandle<()>
where
    V: Clone + Serialize + Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting cache cleanup task with interval of {} seconds", interval_secs);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.cleanup();

            if removed > 0 {
                info!("Cache cleanup: removed {} expired entries", removed);
            } else {
                debug!("Cache cleanup: no expired entries found");
            }
        }
    })
}

/// Spawns a task that drops finished bulk operations older than `retention`.
pub fn spawn_operation_cleanup_task(
    service: BulkOperationsService,
    interval_secs: u64,
    retention: chrono::Duration,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting bulk operation cleanup task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = service.cleanup_completed_operations(retention).await;

            if removed > 0 {
                info!("Operation cleanup: removed {} finished operations", removed);
            } else {
                debug!("Operation cleanup: nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::{
        BulkAction, BulkSettings, EntityType, InMemoryEntityStore, OperationStatus,
    };
    use crate::cache::CacheOptions;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_cache_cleanup_task_removes_expired_entries() {
        let cache: Arc<RwLock<CacheStore<Value>>> =
            Arc::new(RwLock::new(CacheStore::new(100, 300)));
        {
            let mut guard = cache.write().await;
            guard.set("expired", json!(1), CacheOptions::with_ttl(0));
            guard.set("long_lived", json!(2), CacheOptions::with_ttl(3600));
        }

        let handle = spawn_cache_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let guard = cache.read().await;
            assert_eq!(guard.len(), 1, "expired entry should have been purged");
            assert_eq!(guard.keys(None), vec!["long_lived".to_string()]);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache: Arc<RwLock<CacheStore<Value>>> = Arc::new(RwLock::new(CacheStore::new(10, 300)));
        let handle = spawn_cache_cleanup_task(cache, 1);

        handle.abort();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }

    #[tokio::test]
    async fn test_operation_cleanup_task_drops_finished_operations() {
        let service = BulkOperationsService::new(
            Arc::new(InMemoryEntityStore::new()),
            BulkSettings {
                item_delay: Duration::ZERO,
                item_timeout: None,
            },
        );
        let op = service
            .create_operation(EntityType::Donation, BulkAction::Delete, vec!["d1".into()], None)
            .await
            .unwrap();
        // Either outcome is terminal: cancelled here, or failed on the missing record
        service.cancel_operation(op.id).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        let status = service.get_operation(op.id).await.map(|o| o.status);
        assert!(matches!(
            status,
            Some(OperationStatus::Cancelled | OperationStatus::Failed)
        ));

        // A negative retention puts the cutoff in the future.
        let handle =
            spawn_operation_cleanup_task(service.clone(), 1, chrono::Duration::seconds(-60));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(service.get_operation(op.id).await.is_none());
        handle.abort();
    }
}
