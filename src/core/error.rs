//! Typed error handling for the probe adapter
//!
//! Every data provider operation and every HTTP handler returns a
//! [`ProbeResult`]. The dispatcher turns a [`ProbeError`] into an HTTP status
//! and a JSON error body, so clients can tell a missing record (404) from an
//! operation the active backend cannot perform (501).
//!
//! # Error Categories
//!
//! - [`ProbeError::NotFound`]: identifier lookup miss
//! - [`ProbeError::Unsupported`]: operation meaningless for the backend
//! - [`ProbeError::LoadFailure`]: snapshot archive missing or corrupt
//! - [`ProbeError::BadRequest`] / [`ProbeError::MethodNotAllowed`]: dispatcher level
//! - [`ProbeError::Remote`]: live backend transport or protocol failure
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match provider.receive_bean("42", false, false).await {
//!     Ok(json) => println!("{json}"),
//!     Err(ProbeError::NotFound { kind, id }) => println!("no {kind} {id}"),
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type of the adapter
#[derive(Debug, Error)]
pub enum ProbeError {
    /// No record of the given kind has the requested `id`
    #[error("No {kind} found for: {id}")]
    NotFound { kind: String, id: String },

    /// The operation has no meaning for the active backend
    #[error("Operation '{operation}' is not supported by this data provider")]
    Unsupported { operation: String },

    /// The snapshot archive could not be loaded
    #[error("Cannot load {source_name}: {message}")]
    LoadFailure {
        source_name: String,
        message: String,
    },

    /// Malformed request (unknown verb on a non HTTP/1.1 request)
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The verb is not accepted for the requested path
    #[error("Method {method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// The live backend could not be reached or answered with an error
    #[error("Remote probe error: {message}")]
    Remote { message: String },

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Anything else raised while handling a request
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ProbeError {
    /// Shorthand for [`ProbeError::NotFound`]
    pub fn not_found(kind: &str, id: &str) -> Self {
        ProbeError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for [`ProbeError::Unsupported`]
    pub fn unsupported(operation: &str) -> Self {
        ProbeError::Unsupported {
            operation: operation.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProbeError::NotFound { .. } => StatusCode::NOT_FOUND,
            ProbeError::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
            ProbeError::LoadFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProbeError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ProbeError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ProbeError::Remote { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProbeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProbeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ProbeError::NotFound { .. } => "NOT_FOUND",
            ProbeError::Unsupported { .. } => "UNSUPPORTED_OPERATION",
            ProbeError::LoadFailure { .. } => "LOAD_FAILURE",
            ProbeError::BadRequest { .. } => "BAD_REQUEST",
            ProbeError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            ProbeError::Remote { .. } => "REMOTE_ERROR",
            ProbeError::Config(_) => "CONFIG_ERROR",
            ProbeError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ProbeError::NotFound { kind, id } => Some(serde_json::json!({
                "kind": kind,
                "id": id
            })),
            ProbeError::Unsupported { operation } => {
                Some(serde_json::json!({ "operation": operation }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ProbeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::Internal(format!("JSON encoding failed: {}", err))
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found or unreadable
    #[error("Configuration file not readable: {path}")]
    FileNotFound { path: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    /// Both or neither of the data sources were given
    #[error("Exactly one data source is required: an archive path or a remote URL")]
    AmbiguousSource,

    /// A value is out of its legal range
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;
