//! API Module
//!
//! HTTP handlers and routing.
//!
//! # Endpoints
//! - `GET /health` - Health check
//! - `PUT /cache/set`, `GET /cache/get/:key`, `DELETE /cache/del/:key`,
//!   `GET /cache/has/:key` - Single key access
//! - `GET|DELETE /cache/keys?pattern=` - List or delete keys by glob
//! - `GET /cache/stats`, `POST /cache/cleanup`, `DELETE /cache` - Maintenance
//! - `POST|GET /api/bulk-operations` - Start or list bulk operations
//! - `GET|DELETE /api/bulk-operations/:id` - Inspect or cancel one operation
//! - `PUT|GET /api/entities/:entity_type/:id` - In-memory backend records

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
