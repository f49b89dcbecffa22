//! Bulk Operations Service
//!
//! Owns the operation registry, runs each batch as a background task and
//! reports progress to subscribers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bulk::{
    generate_export_file, validate_operation, BulkAction, BulkOperation, EntityExecutor,
    EntityType, ExecutorError, OperationStatus,
};
use crate::config::Config;
use crate::error::{AppError, Result};

/// Retention applied by the periodic registry cleanup unless configured otherwise.
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

/// Callback invoked with a snapshot after every state transition.
pub type Subscriber = Arc<dyn Fn(&BulkOperation) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// == Settings ==
/// Execution pacing for batches.
#[derive(Debug, Clone)]
pub struct BulkSettings {
    /// Pause between two items; cancellation interrupts it
    pub item_delay: Duration,
    /// Upper bound for a single executor call
    pub item_timeout: Option<Duration>,
}

impl Default for BulkSettings {
    fn default() -> Self {
        Self {
            item_delay: Duration::from_millis(50),
            item_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl BulkSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            item_delay: config.item_delay(),
            item_timeout: config.item_timeout(),
        }
    }
}

// == Registry ==
struct Tracked {
    operation: BulkOperation,
    /// Creation order, breaks ties between equal start times
    seq: u64,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Registry {
    operations: HashMap<Uuid, Tracked>,
    next_seq: u64,
}

impl Registry {
    fn sorted(&self, status: Option<OperationStatus>) -> Vec<BulkOperation> {
        let mut tracked: Vec<&Tracked> = self
            .operations
            .values()
            .filter(|t| status.map_or(true, |s| t.operation.status == s))
            .collect();
        tracked.sort_by(|a, b| {
            (b.operation.started_at, b.seq).cmp(&(a.operation.started_at, a.seq))
        });
        tracked.into_iter().map(|t| t.operation.clone()).collect()
    }
}

// == Bulk Operations Service ==
/// Cloneable handle; clones share the same registry and subscribers.
#[derive(Clone)]
pub struct BulkOperationsService {
    registry: Arc<RwLock<Registry>>,
    subscribers: Arc<RwLock<Vec<(SubscriptionId, Subscriber)>>>,
    next_subscriber: Arc<AtomicU64>,
    executor: Arc<dyn EntityExecutor>,
    settings: BulkSettings,
}

impl BulkOperationsService {
    pub fn new(executor: Arc<dyn EntityExecutor>, settings: BulkSettings) -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::default())),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            next_subscriber: Arc::new(AtomicU64::new(0)),
            executor,
            settings,
        }
    }

    // == Create ==
    /// Validates the request, registers a running operation and starts it in
    /// the background. Returns the initial snapshot without waiting.
    pub async fn create_operation(
        &self,
        entity_type: EntityType,
        action: BulkAction,
        entity_ids: Vec<String>,
        data: Option<Value>,
    ) -> Result<BulkOperation> {
        let validation = validate_operation(entity_type, action, &entity_ids);
        if !validation.valid {
            return Err(AppError::validation(validation.errors));
        }

        let operation = BulkOperation::start(entity_type, action, entity_ids, data);
        let cancel = CancellationToken::new();
        {
            let mut registry = self.registry.write().await;
            let seq = registry.next_seq;
            registry.next_seq += 1;
            registry.operations.insert(
                operation.id,
                Tracked {
                    operation: operation.clone(),
                    seq,
                    cancel: cancel.clone(),
                },
            );
            self.notify(&operation).await;
        }

        info!(
            operation_id = %operation.id,
            entity_type = %entity_type,
            action = %action,
            total = operation.total,
            "Bulk operation started"
        );

        let service = self.clone();
        let id = operation.id;
        tokio::spawn(async move { service.run(id, cancel).await });

        Ok(operation)
    }

    // == Cancel ==
    /// Cancels a live operation. Returns false for unknown or finished ids.
    pub async fn cancel_operation(&self, id: Uuid) -> bool {
        let mut registry = self.registry.write().await;
        let Some(tracked) = registry.operations.get_mut(&id) else {
            return false;
        };
        if !tracked.operation.cancel() {
            return false;
        }
        tracked.cancel.cancel();
        let snapshot = tracked.operation.clone();
        self.notify(&snapshot).await;
        info!(operation_id = %id, processed = snapshot.processed, "Bulk operation cancelled");
        true
    }

    // == Queries ==
    pub async fn get_operation(&self, id: Uuid) -> Option<BulkOperation> {
        self.registry
            .read()
            .await
            .operations
            .get(&id)
            .map(|t| t.operation.clone())
    }

    /// All operations, most recently started first.
    pub async fn get_all_operations(&self) -> Vec<BulkOperation> {
        self.registry.read().await.sorted(None)
    }

    pub async fn get_operations_by_status(&self, status: OperationStatus) -> Vec<BulkOperation> {
        self.registry.read().await.sorted(Some(status))
    }

    // == Subscriptions ==
    /// Registers a callback for every transition of every operation.
    ///
    /// Callbacks run while the registry is locked and must not block.
    pub async fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&BulkOperation) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscriber.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().await.push((id, Arc::new(callback)));
        id
    }

    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write().await;
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    async fn notify(&self, operation: &BulkOperation) {
        let subscribers = self.subscribers.read().await;
        for (_, callback) in subscribers.iter() {
            callback(operation);
        }
    }

    // == Cleanup ==
    /// Drops finished operations whose completion is older than `retention`.
    pub async fn cleanup_completed_operations(&self, retention: chrono::Duration) -> usize {
        self.remove_finished_before(Utc::now() - retention).await
    }

    /// Drops finished operations completed before `cutoff`.
    pub async fn remove_finished_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut registry = self.registry.write().await;
        let before = registry.operations.len();
        registry.operations.retain(|_, t| {
            let op = &t.operation;
            !(op.status.is_terminal()
                && op.completed_at.unwrap_or(DateTime::<Utc>::MIN_UTC) < cutoff)
        });
        before - registry.operations.len()
    }

    // == Execution ==
    async fn run(&self, id: Uuid, cancel: CancellationToken) {
        let Some(operation) = self.get_operation(id).await else {
            return;
        };
        let (entity_type, action) = (operation.entity_type, operation.action);
        if cancel.is_cancelled() {
            return;
        }

        let payload = match item_payload(action, operation.data.as_ref()) {
            Ok(payload) => payload,
            Err(message) => {
                warn!(operation_id = %id, error = message, "Bulk operation rejected");
                self.update(id, |op| op.abort(message)).await;
                return;
            }
        };

        let mut exported = Vec::new();
        let last = operation.entity_ids.len().saturating_sub(1);
        for (index, entity_id) in operation.entity_ids.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }

            let outcome = self
                .execute_item(entity_type, action, entity_id, payload.as_ref())
                .await;
            let tracked = self
                .update(id, |op| match &outcome {
                    Ok(_) => op.record_success(),
                    Err(e) => op.record_failure(entity_id.as_str(), e.to_string()),
                })
                .await;
            match outcome {
                Ok(record) => {
                    debug!(
                        operation_id = %id,
                        entity_id = entity_id.as_str(),
                        "Bulk item succeeded"
                    );
                    exported.extend(record);
                }
                Err(e) => {
                    warn!(
                        operation_id = %id,
                        entity_id = entity_id.as_str(),
                        error = %e,
                        "Bulk item failed"
                    );
                }
            }
            if !tracked {
                return;
            }

            if index < last && !self.settings.item_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.settings.item_delay) => {}
                }
            }
        }

        self.update(id, |op| {
            if op.status == OperationStatus::Running && action == BulkAction::Export {
                op.result = Some(generate_export_file(&exported, entity_type));
            }
            op.finish();
        })
        .await;

        if let Some(op) = self.get_operation(id).await {
            info!(
                operation_id = %id,
                status = ?op.status,
                succeeded = op.succeeded,
                failed = op.failed,
                "Bulk operation finished"
            );
        }
    }

    async fn execute_item(
        &self,
        entity_type: EntityType,
        action: BulkAction,
        entity_id: &str,
        payload: Option<&Value>,
    ) -> std::result::Result<Option<Value>, ExecutorError> {
        let call = self.executor.execute(entity_type, action, entity_id, payload);
        match self.settings.item_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(ExecutorError(format!("Timed out after {limit:?}")))),
            None => call.await,
        }
    }

    /// Applies `f` to a registered operation and notifies subscribers.
    /// Returns false when the operation is no longer registered.
    async fn update<F>(&self, id: Uuid, f: F) -> bool
    where
        F: FnOnce(&mut BulkOperation),
    {
        let mut registry = self.registry.write().await;
        let Some(tracked) = registry.operations.get_mut(&id) else {
            return false;
        };
        f(&mut tracked.operation);
        let snapshot = tracked.operation.clone();
        self.notify(&snapshot).await;
        true
    }
}

/// Translates an action and its request data into the per-item body.
fn item_payload(
    action: BulkAction,
    data: Option<&Value>,
) -> std::result::Result<Option<Value>, &'static str> {
    let field = |name: &str| data.and_then(|d| d.get(name)).filter(|v| !v.is_null());

    let payload = match action {
        BulkAction::Delete | BulkAction::Export => None,
        BulkAction::Update => Some(data.cloned().unwrap_or_else(|| json!({}))),
        BulkAction::Archive => Some(json!({ "status": "archived" })),
        BulkAction::Activate => Some(json!({ "isActive": true })),
        BulkAction::Deactivate => Some(json!({ "isActive": false })),
        BulkAction::Assign => {
            let assignee = field("assigneeId").ok_or("Assignee ID is required")?;
            Some(json!({ "assignedTo": assignee }))
        }
        BulkAction::Tag => {
            let tags = field("tags").ok_or("Tags are required")?;
            Some(json!({ "tags": tags }))
        }
    };
    Ok(payload)
}
