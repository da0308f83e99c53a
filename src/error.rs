//! Error types for the offline worker
//!
//! Provides unified error handling using thiserror. None of these errors is
//! fatal to the worker: the interceptor recovers from network and cache
//! failures locally, and only the host endpoints surface them to callers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Worker Error Enum ==
/// Unified error type for the offline worker.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// One or more static assets could not be fetched during install
    #[error("Failed to cache static files: {0}")]
    ManifestCacheFailure(String),

    /// The network request failed (connection, DNS, timeout)
    #[error("Network failure: {0}")]
    Network(String),

    /// Storing a response failed (e.g. quota exceeded)
    #[error("Cache write failed: {0}")]
    CacheWrite(String),

    /// Lifecycle operation attempted in the wrong state
    #[error("Invalid worker state: {0}")]
    InvalidState(String),

    /// Malformed input on a host endpoint
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal host error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        let status = match &self {
            WorkerError::ManifestCacheFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WorkerError::Network(_) => StatusCode::BAD_GATEWAY,
            WorkerError::CacheWrite(_) => StatusCode::INSUFFICIENT_STORAGE,
            WorkerError::InvalidState(_) => StatusCode::CONFLICT,
            WorkerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            WorkerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the offline worker.
pub type Result<T> = std::result::Result<T, WorkerError>;
