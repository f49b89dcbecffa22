//! Bulk Operation Model
//!
//! Entity types, actions, statuses and the tracked operation record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// == Entity Type ==
/// Category of record a bulk operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Beneficiary,
    Donation,
    User,
    Task,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Beneficiary,
        EntityType::Donation,
        EntityType::User,
        EntityType::Task,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Beneficiary => "beneficiary",
            EntityType::Donation => "donation",
            EntityType::User => "user",
            EntityType::Task => "task",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown entity type: {s}"))
    }
}

// == Bulk Action ==
/// Verb applied to every selected entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Delete,
    Update,
    Export,
    Archive,
    Assign,
    Tag,
    Activate,
    Deactivate,
}

impl BulkAction {
    pub const ALL: [BulkAction; 8] = [
        BulkAction::Delete,
        BulkAction::Update,
        BulkAction::Export,
        BulkAction::Archive,
        BulkAction::Assign,
        BulkAction::Tag,
        BulkAction::Activate,
        BulkAction::Deactivate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Delete => "delete",
            BulkAction::Update => "update",
            BulkAction::Export => "export",
            BulkAction::Archive => "archive",
            BulkAction::Assign => "assign",
            BulkAction::Tag => "tag",
            BulkAction::Activate => "activate",
            BulkAction::Deactivate => "deactivate",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BulkAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("Unknown action: {s}"))
    }
}

// == Operation Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl OperationStatus {
    /// Completed, failed and cancelled operations never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Completed | OperationStatus::Failed | OperationStatus::Cancelled
        )
    }
}

impl FromStr for OperationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OperationStatus::Pending),
            "running" => Ok(OperationStatus::Running),
            "completed" => Ok(OperationStatus::Completed),
            "failed" => Ok(OperationStatus::Failed),
            "cancelled" => Ok(OperationStatus::Cancelled),
            other => Err(format!("Unknown status: {other}")),
        }
    }
}

// == Item Error ==
/// Failure of a single entity within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperationError {
    /// Entity that failed, or `"system"` for batch-level failures
    pub entity_id: String,
    pub error: String,
}

// == Export Result ==
/// File produced by an `export` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

// == Bulk Operation ==
/// Tracked state of one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperation {
    pub id: Uuid,
    pub entity_type: EntityType,
    pub action: BulkAction,
    pub entity_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub status: OperationStatus,
    /// processed / total, in percent
    pub progress: f64,
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<BulkOperationError>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ExportFile>,
}

impl BulkOperation {
    /// Creates a running operation; inputs are assumed validated.
    pub fn start(
        entity_type: EntityType,
        action: BulkAction,
        entity_ids: Vec<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_type,
            action,
            total: entity_ids.len(),
            entity_ids,
            data,
            status: OperationStatus::Running,
            progress: 0.0,
            processed: 0,
            succeeded: 0,
            failed: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
            result: None,
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
        self.advance();
    }

    pub fn record_failure(&mut self, entity_id: impl Into<String>, error: impl Into<String>) {
        self.failed += 1;
        self.errors.push(BulkOperationError {
            entity_id: entity_id.into(),
            error: error.into(),
        });
        self.advance();
    }

    fn advance(&mut self) {
        self.processed += 1;
        self.progress = if self.total == 0 {
            100.0
        } else {
            self.processed as f64 / self.total as f64 * 100.0
        };
    }

    /// Resolves a running operation: failed only when every item failed.
    pub fn finish(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.status = if self.total > 0 && self.failed == self.total {
            OperationStatus::Failed
        } else {
            OperationStatus::Completed
        };
        self.completed_at = Some(Utc::now());
    }

    /// Fails the whole batch before any item runs. A finished or cancelled
    /// operation is left untouched.
    pub fn abort(&mut self, error: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.errors.push(BulkOperationError {
            entity_id: "system".to_string(),
            error: error.into(),
        });
        self.status = OperationStatus::Failed;
        self.completed_at = Some(Utc::now());
    }

    /// Returns true if the operation was live and is now cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = OperationStatus::Cancelled;
        self.completed_at = Some(Utc::now());
        true
    }
}
