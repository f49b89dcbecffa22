//! Dernek Ops - cache and bulk operations core of the association management system
//!
//! Provides a TTL/LRU in-memory cache and a tracked bulk operation runner,
//! exposed over HTTP.

pub mod api;
pub mod bulk;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::{spawn_cache_cleanup_task, spawn_operation_cleanup_task};
