//! Bulk Operations Module
//!
//! Applies one action to many entities of one type as a tracked background job.

mod executor;
mod export;
mod model;
mod service;
mod validation;

pub use executor::{EntityExecutor, ExecutorError, InMemoryEntityStore};
pub use export::generate_export_file;
pub use model::{
    BulkAction, BulkOperation, BulkOperationError, EntityType, ExportFile, OperationStatus,
};
pub use service::{
    BulkOperationsService, BulkSettings, Subscriber, SubscriptionId, DEFAULT_RETENTION_DAYS,
};
pub use validation::{
    allowed_actions, is_action_allowed, validate_operation, ValidationResult,
    MAX_ENTITIES_PER_OPERATION,
};
