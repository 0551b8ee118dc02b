//! Error types for Curator operations
//!
//! This module provides the crate-wide error handling system with:
//! - Structured error types with descriptive messages
//! - Error codes for programmatic handling
//! - HTTP status code mapping for server integrations
//! - Error categories for grouping and filtering
//! - JSON serialization for API responses
//!
//! Structural problems inside a rule configuration are *not* errors in this
//! taxonomy: they are accumulated as [`crate::rules::ValidationIssue`]s so a
//! caller can report every problem at once. `CuratorError` covers the cases
//! where a pipeline run cannot proceed at all.
//!
//! # Example
//!
//! ```rust
//! use curator_core::error::{CuratorError, ErrorCategory};
//!
//! fn handle_error(err: CuratorError) {
//!     match err.category() {
//!         ErrorCategory::Validation => println!("Fix the rule config"),
//!         ErrorCategory::External => println!("Record store trouble"),
//!         ErrorCategory::Internal => println!("Bug, please report"),
//!     }
//!
//!     if err.is_recoverable() {
//!         println!("Retry may succeed");
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Curator operations
pub type Result<T> = std::result::Result<T, CuratorError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Input validation failed (400)
    Validation,
    /// Internal engine error (500)
    Internal,
    /// External record store error (502)
    External,
}

/// Errors that can occur in Curator operations
///
/// All errors include:
/// - A human-readable error message
/// - A stable error code for programmatic handling
/// - A category for grouping
/// - An HTTP status code for server integrations
#[derive(Error, Debug)]
pub enum CuratorError {
    /// Rule configuration was rejected by the validator
    #[error("Invalid rule config: {reason}. Run the validator for per-field detail.")]
    InvalidRuleConfig { reason: String },

    /// The external record store call failed (timeout, connection loss)
    #[error("Record store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// Record store lock is poisoned (panic occurred while holding lock)
    #[error("Record store lock poisoned. This is a bug; please report it.")]
    StoreLocked,

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("IO error: {message}")]
    IoError { message: String },

    /// Internal error that shouldn't happen
    #[error("Internal error: {reason}. This is a bug; please report it.")]
    InternalError { reason: String },
}

impl CuratorError {
    /// Returns true if this error might succeed on retry
    ///
    /// Store failures are transient from the engine's point of view; a
    /// rejected rule config will keep failing until the config changes.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CuratorError::StoreUnavailable { .. } | CuratorError::StoreLocked
        )
    }

    /// Returns true if this error is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(self.http_status_code(), 400..=499)
    }

    /// Returns true if this error is a server error (5xx equivalent)
    pub fn is_server_error(&self) -> bool {
        matches!(self.http_status_code(), 500..=599)
    }

    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            CuratorError::InvalidRuleConfig { .. } => ErrorCategory::Validation,

            CuratorError::StoreLocked | CuratorError::InternalError { .. } => {
                ErrorCategory::Internal
            }

            CuratorError::StoreUnavailable { .. }
            | CuratorError::JsonError(_)
            | CuratorError::IoError { .. } => ErrorCategory::External,
        }
    }

    /// Returns the stable error code for this error
    ///
    /// Error codes are uppercase, underscore-separated identifiers that
    /// remain stable across versions. Use these for client-side error
    /// handling, logging, and alerting.
    pub fn error_code(&self) -> &'static str {
        match self {
            CuratorError::InvalidRuleConfig { .. } => "INVALID_RULE_CONFIG",
            CuratorError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            CuratorError::StoreLocked => "STORE_LOCKED",
            CuratorError::JsonError(_) => "JSON_ERROR",
            CuratorError::IoError { .. } => "IO_ERROR",
            CuratorError::InternalError { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error
    ///
    /// Use this when building HTTP API responses. Maps errors to
    /// appropriate HTTP status codes following REST conventions.
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client sent invalid data
            CuratorError::InvalidRuleConfig { .. } => 400,

            // 500 Internal Server Error - Our fault
            CuratorError::StoreLocked | CuratorError::InternalError { .. } => 500,

            // 502 Bad Gateway - External dependency failed
            CuratorError::StoreUnavailable { .. }
            | CuratorError::JsonError(_)
            | CuratorError::IoError { .. } => 502,
        }
    }

    /// Converts this error to a JSON-serializable response object
    ///
    /// Returns a structure suitable for API error responses:
    /// ```json
    /// {
    ///   "error": {
    ///     "code": "STORE_UNAVAILABLE",
    ///     "message": "Record store unavailable: ...",
    ///     "category": "external",
    ///     "recoverable": true
    ///   }
    /// }
    /// ```
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
                recoverable: self.is_recoverable(),
            },
        }
    }
}

/// JSON-serializable error response for APIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail for JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code (e.g., "STORE_UNAVAILABLE")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category
    pub category: ErrorCategory,
    /// Whether retry might succeed
    pub recoverable: bool,
}
