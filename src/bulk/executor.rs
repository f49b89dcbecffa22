//! Entity Executor
//!
//! The data-access seam bulk operations drive, one entity at a time, plus an
//! in-memory backend used by the server and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::bulk::{BulkAction, EntityType};

/// Failure of a single entity call. The message is stored verbatim on the operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ExecutorError(pub String);

impl ExecutorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Performs one action on one entity.
///
/// `payload` is the already-translated body for update-like actions. Export
/// calls return the fetched record.
#[async_trait]
pub trait EntityExecutor: Send + Sync {
    async fn execute(
        &self,
        entity_type: EntityType,
        action: BulkAction,
        entity_id: &str,
        payload: Option<&Value>,
    ) -> Result<Option<Value>, ExecutorError>;
}

// == In-Memory Entity Store ==
/// Mock backend keeping records as JSON objects per entity type.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    records: RwLock<HashMap<EntityType, HashMap<String, Value>>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record.
    pub async fn insert(&self, entity_type: EntityType, id: impl Into<String>, record: Value) {
        self.records
            .write()
            .await
            .entry(entity_type)
            .or_default()
            .insert(id.into(), record);
    }

    pub async fn get(&self, entity_type: EntityType, id: &str) -> Option<Value> {
        self.records
            .read()
            .await
            .get(&entity_type)
            .and_then(|records| records.get(id))
            .cloned()
    }

    pub async fn len(&self, entity_type: EntityType) -> usize {
        self.records
            .read()
            .await
            .get(&entity_type)
            .map_or(0, HashMap::len)
    }

    async fn delete(&self, entity_type: EntityType, id: &str) -> Result<(), ExecutorError> {
        let mut records = self.records.write().await;
        records
            .get_mut(&entity_type)
            .and_then(|records| records.remove(id))
            .map(|_| ())
            .ok_or_else(|| ExecutorError(format!("Failed to delete {entity_type}: Not Found")))
    }

    async fn update(
        &self,
        entity_type: EntityType,
        id: &str,
        payload: Option<&Value>,
    ) -> Result<(), ExecutorError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&entity_type)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| ExecutorError(format!("Failed to update {entity_type}: Not Found")))?;

        match (record, payload) {
            (Value::Object(target), Some(Value::Object(fields))) => {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
                Ok(())
            }
            (_, None) => Ok(()),
            (record, Some(payload)) => {
                *record = payload.clone();
                Ok(())
            }
        }
    }
}

#[async_trait]
impl EntityExecutor for InMemoryEntityStore {
    async fn execute(
        &self,
        entity_type: EntityType,
        action: BulkAction,
        entity_id: &str,
        payload: Option<&Value>,
    ) -> Result<Option<Value>, ExecutorError> {
        match action {
            BulkAction::Delete => self.delete(entity_type, entity_id).await.map(|_| None),
            BulkAction::Export => self
                .get(entity_type, entity_id)
                .await
                .map(Some)
                .ok_or_else(|| ExecutorError(format!("Failed to fetch {entity_type}: Not Found"))),
            _ => self
                .update(entity_type, entity_id, payload)
                .await
                .map(|_| None),
        }
    }
}
