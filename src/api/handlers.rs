//! API Handlers
//!
//! HTTP request handlers for the cache, bulk operation and entity endpoints.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::bulk::{
    BulkOperation, BulkOperationsService, BulkSettings, EntityType, InMemoryEntityStore,
};
use crate::cache::{CacheOptions, CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    validate_key, ApiResponse, CancelResult, CreateOperationRequest, DeleteResponse, GetResponse,
    HasResponse, HealthResponse, KeysResponse, PatternQuery, RemovedResponse, SetRequest,
    SetResponse, StatusQuery,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache store
    pub cache: Arc<RwLock<CacheStore<Value>>>,
    /// Bulk operation registry and runner
    pub bulk: BulkOperationsService,
    /// Backend the bulk runner mutates
    pub entities: Arc<InMemoryEntityStore>,
}

impl AppState {
    /// Creates a new AppState around the given cache, backed by an empty
    /// in-memory entity store.
    pub fn new(cache: CacheStore<Value>, settings: BulkSettings) -> Self {
        let entities = Arc::new(InMemoryEntityStore::new());
        let bulk = BulkOperationsService::new(entities.clone(), settings);
        Self {
            cache: Arc::new(RwLock::new(cache)),
            bulk,
            entities,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheStore::new(config.max_entries, config.default_ttl);
        Self::new(cache, BulkSettings::from_config(config))
    }
}

// == Cache Handlers ==

/// Handler for PUT /cache/set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let options = CacheOptions {
        ttl_seconds: req.ttl,
    };
    state.cache.write().await.set(req.key.clone(), req.value, options);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /cache/get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: reads update hit counters and access time
    let value = state.cache.write().await.get(&key);

    value
        .map(|value| Json(GetResponse::new(key.clone(), value)))
        .ok_or_else(|| AppError::NotFound(format!("Key not found: {key}")))
}

/// Handler for DELETE /cache/del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.cache.write().await.delete(&key) {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(AppError::NotFound(format!("Key not found: {key}")))
    }
}

/// Handler for GET /cache/has/:key
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<HasResponse> {
    let exists = state.cache.write().await.has(&key);
    Json(HasResponse { key, exists })
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.read().await.stats())
}

/// Handler for GET /cache/keys?pattern=
pub async fn keys_handler(
    State(state): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> Json<KeysResponse> {
    let mut keys = state.cache.read().await.keys(query.pattern.as_deref());
    keys.sort();
    Json(KeysResponse { keys })
}

/// Handler for DELETE /cache/keys?pattern=
pub async fn delete_pattern_handler(
    State(state): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> Result<Json<RemovedResponse>> {
    let pattern = query
        .pattern
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Pattern is required".to_string()))?;

    let removed = state.cache.write().await.delete_pattern(&pattern);
    Ok(Json(RemovedResponse { removed }))
}

/// Handler for POST /cache/cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.cache.write().await.cleanup();
    Json(RemovedResponse { removed })
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.len();
    cache.clear();
    Json(RemovedResponse { removed })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// == Bulk Operation Handlers ==

/// Handler for POST /api/bulk-operations
pub async fn create_operation_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateOperationRequest>,
) -> Result<Json<ApiResponse<BulkOperation>>> {
    let (entity_type, action) = req.parse()?;
    let operation = state
        .bulk
        .create_operation(entity_type, action, req.entity_ids, req.data)
        .await?;

    Ok(Json(ApiResponse::ok(operation).with_message("Toplu işlem başlatıldı")))
}

/// Handler for GET /api/bulk-operations?status=
pub async fn list_operations_handler(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ApiResponse<Vec<BulkOperation>>>> {
    let operations = match query.parse()? {
        Some(status) => state.bulk.get_operations_by_status(status).await,
        None => state.bulk.get_all_operations().await,
    };
    Ok(Json(ApiResponse::ok(operations)))
}

/// Handler for GET /api/bulk-operations/:id
pub async fn get_operation_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BulkOperation>>> {
    state
        .bulk
        .get_operation(id)
        .await
        .map(|op| Json(ApiResponse::ok(op)))
        .ok_or_else(|| AppError::NotFound("İşlem bulunamadı".to_string()))
}

/// Handler for DELETE /api/bulk-operations/:id
///
/// Always succeeds; `cancelled` tells whether anything changed.
pub async fn cancel_operation_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<ApiResponse<CancelResult>> {
    let cancelled = state.bulk.cancel_operation(id).await;
    Json(ApiResponse::ok(CancelResult { cancelled }).with_message("İşlem iptal edildi"))
}

// == Entity Handlers ==

fn parse_entity_type(raw: &str) -> Result<EntityType> {
    raw.parse::<EntityType>().map_err(AppError::InvalidRequest)
}

/// Handler for PUT /api/entities/:entity_type/:id
pub async fn put_entity_handler(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, String)>,
    Json(record): Json<Value>,
) -> Result<Json<ApiResponse<Value>>> {
    let entity_type = parse_entity_type(&entity_type)?;
    if let Some(error_msg) = validate_key(&id) {
        return Err(AppError::InvalidRequest(error_msg));
    }

    state.entities.insert(entity_type, id, record.clone()).await;
    Ok(Json(ApiResponse::ok(record)))
}

/// Handler for GET /api/entities/:entity_type/:id
pub async fn get_entity_handler(
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Value>>> {
    let entity_type = parse_entity_type(&entity_type)?;
    state
        .entities
        .get(entity_type, &id)
        .await
        .map(|record| Json(ApiResponse::ok(record)))
        .ok_or_else(|| AppError::NotFound(format!("{entity_type} {id} not found")))
}
