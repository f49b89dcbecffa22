//! Request DTOs
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::bulk::{BulkAction, EntityType, OperationStatus};
use crate::cache::MAX_KEY_LENGTH;
use crate::error::{AppError, Result};

/// Request body for `PUT /cache/set`
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// Any JSON value
    pub value: Value,
    /// Optional TTL in seconds; zero or negative stores an already expired entry
    #[serde(default)]
    pub ttl: Option<i64>,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Checks a cache key against the length limits.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Query string for the key listing and pattern delete endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternQuery {
    pub pattern: Option<String>,
}

/// Request body for `POST /api/bulk-operations`
///
/// Entity type and action arrive as raw strings so unknown names map to a
/// 400 with a readable message instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperationRequest {
    pub entity_type: String,
    pub action: String,
    pub entity_ids: Vec<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl CreateOperationRequest {
    /// Parses the entity type and action names.
    pub fn parse(&self) -> Result<(EntityType, BulkAction)> {
        let entity_type = self
            .entity_type
            .parse::<EntityType>()
            .map_err(AppError::InvalidRequest)?;
        let action = self
            .action
            .parse::<BulkAction>()
            .map_err(AppError::InvalidRequest)?;
        Ok((entity_type, action))
    }
}

/// Query string for `GET /api/bulk-operations`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

impl StatusQuery {
    pub fn parse(&self) -> Result<Option<OperationStatus>> {
        self.status
            .as_deref()
            .map(|s| s.parse::<OperationStatus>().map_err(AppError::InvalidRequest))
            .transpose()
    }
}
