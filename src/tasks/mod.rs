//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache cleanup: purges expired cache entries
//! - Operation cleanup: drops finished bulk operations past their retention

mod cleanup;

pub use cleanup::{spawn_cache_cleanup_task, spawn_operation_cleanup_task};
