//! Request and Response models for the HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    validate_key, CreateOperationRequest, PatternQuery, SetRequest, StatusQuery,
};
pub use responses::{
    ApiResponse, CancelResult, DeleteResponse, ErrorResponse, GetResponse, HasResponse,
    HealthResponse, KeysResponse, RemovedResponse, SetResponse,
};
