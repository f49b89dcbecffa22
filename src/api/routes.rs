//! API Routes
//!
//! Configures the Axum router with the cache, bulk operation and entity endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cancel_operation_handler, cleanup_handler, clear_handler, create_operation_handler,
    delete_handler, delete_pattern_handler, get_entity_handler, get_handler,
    get_operation_handler, has_handler, health_handler, keys_handler, list_operations_handler,
    put_entity_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cache = Router::new()
        .route("/", delete(clear_handler))
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/has/:key", get(has_handler))
        .route("/keys", get(keys_handler).delete(delete_pattern_handler))
        .route("/stats", get(stats_handler))
        .route("/cleanup", post(cleanup_handler));

    let api = Router::new()
        .route(
            "/bulk-operations",
            post(create_operation_handler).get(list_operations_handler),
        )
        .route(
            "/bulk-operations/:id",
            get(get_operation_handler).delete(cancel_operation_handler),
        )
        .route(
            "/entities/:entity_type/:id",
            put(put_entity_handler).get(get_entity_handler),
        );

    Router::new()
        .route("/health", get(health_handler))
        .nest("/cache", cache)
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
