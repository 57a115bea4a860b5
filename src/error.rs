//! Error types for linkcheckd
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error variants (validation, persistence, not-found)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes
//!
//! Note that per-URL probe failures are not represented here at all: they
//! are fully absorbed into [`crate::types::LinkStatus::Unavailable`] and
//! never surface as errors.

use crate::types::BatchId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for linkcheckd operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for linkcheckd
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "store.ttl_secs")
        key: Option<String>,
    },

    /// Malformed or rejected submission payload
    #[error("invalid submission: {0}")]
    Validation(String),

    /// Batch not found
    #[error("batch not found: {0}")]
    NotFound(BatchId),

    /// Shutdown in progress - not accepting new submissions
    #[error("shutdown in progress: not accepting new submissions")]
    ShuttingDown,

    /// Snapshot file contents could not be interpreted
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client construction error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Report rendering error
    #[error("report error: {0}")]
    Report(String),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::Validation(_) => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 503 Service Unavailable
            Error::ShuttingDown => 503,

            // 500 Internal Server Error - Server-side issues
            Error::Snapshot(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::Report(_) => 500,
            Error::ApiServerError(_) => 500,

            // 502 Bad Gateway - External service errors
            Error::Network(_) => 502,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(_) => "invalid_submission",
            Error::NotFound(_) => "batch_not_found",
            Error::ShuttingDown => "shutting_down",
            Error::Snapshot(_) => "snapshot_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::Network(_) => "network_error",
            Error::Report(_) => "report_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

/// JSON error body returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error detail payload
    pub error: ErrorDetail,
}

/// Machine-readable error detail
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Stable machine-readable error code (e.g., "batch_not_found")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional contextual details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::NotFound(id) => Some(serde_json::json!({ "batch_id": id.0 })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({ "key": key })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = Error::NotFound(BatchId(7));
        assert_eq!(error.status_code(), 404);
        assert_eq!(error.error_code(), "batch_not_found");
    }

    #[test]
    fn test_validation_maps_to_400() {
        let error = Error::Validation("empty submission".to_string());
        assert_eq!(error.status_code(), 400);
        assert_eq!(error.error_code(), "invalid_submission");
    }

    #[test]
    fn test_shutting_down_maps_to_503() {
        let error = Error::ShuttingDown;
        assert_eq!(error.status_code(), 503);
        assert_eq!(error.error_code(), "shutting_down");
    }

    #[test]
    fn test_snapshot_maps_to_500() {
        let error = Error::Snapshot("unexpected token".to_string());
        assert_eq!(error.status_code(), 500);
        assert_eq!(error.error_code(), "snapshot_error");
    }

    #[test]
    fn test_error_to_api_error_with_details() {
        let error = Error::NotFound(BatchId(123));
        let api_error: ApiError = error.into();

        assert_eq!(api_error.error.code, "batch_not_found");
        assert!(api_error.error.message.contains("123"));

        let details = api_error.error.details.unwrap();
        assert_eq!(details["batch_id"], 123);
    }
}
