//! Typed error handling
//!
//! # Error Categories
//!
//! - [`ValidationError`]: a request that failed one or more validation steps
//! - [`ConfigError`]: a controller or resource configuration that cannot be used
//! - [`StorageError`]: the filter application layer failed
//! - [`RequestError`]: malformed or missing transport-level parameters
//!
//! [`StepFailure`] is not part of the hierarchy: it is the signal a single
//! validation step returns, collected by the controller into
//! [`ValidationErrors`](crate::core::validation::ValidationErrors).
//!
//! # Example
//!
//! ```rust,ignore
//! let validation = controller.validate(&raw, false);
//! if !validation.is_valid() {
//!     return Err(ApiError::Validation(ValidationError::StepErrors {
//!         error_class: config.error_class.clone(),
//!         errors: validation.errors(),
//!     }));
//! }
//! ```

use crate::core::validation::ErrorReport;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the API layer
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    Config(ConfigError),
    Storage(StorageError),
    Request(RequestError),
    /// Should not happen in normal operation
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Config(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Request(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            ApiError::Config(e) => Some(e),
            ApiError::Storage(e) => Some(e),
            ApiError::Request(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// HTTP status, repeated in the body
    pub response_code: u16,
    /// Per-step validation codes, when the error came from validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage(e) => e.status_code(),
            ApiError::Request(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> String {
        match self {
            ApiError::Validation(e) => e.error_code(),
            ApiError::Config(_) => "CONFIG_ERROR".to_string(),
            ApiError::Storage(StorageError::InvalidFilter { .. }) => "INVALID_FILTER".to_string(),
            ApiError::Storage(_) => "STORAGE_ERROR".to_string(),
            ApiError::Request(e) => e.error_code().to_string(),
            ApiError::Internal(_) => "INTERNAL_ERROR".to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
            response_code: self.status_code().as_u16(),
            errors: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Validation(ValidationError::StepErrors { errors, .. }) => {
                serde_json::to_value(errors).ok()
            }
            ApiError::Validation(ValidationError::InvalidFilter { message, .. }) => {
                Some(serde_json::Value::String(message.clone()))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised once validation has finished
#[derive(Debug)]
pub enum ValidationError {
    /// One or more named steps reported failure codes
    StepErrors {
        /// The resource's error taxonomy, used as the response code when set
        error_class: Option<String>,
        errors: ErrorReport,
    },

    /// The store refused an otherwise whitelisted filter
    InvalidFilter {
        error_class: Option<String>,
        message: String,
    },
}

impl ValidationError {
    pub fn error_code(&self) -> String {
        match self {
            ValidationError::StepErrors { error_class, .. }
            | ValidationError::InvalidFilter { error_class, .. } => error_class
                .clone()
                .unwrap_or_else(|| "VALIDATION_ERROR".to_string()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::StepErrors { errors, .. } => {
                let steps: Vec<&str> = errors.steps().collect();
                write!(f, "Validation failed for: {}", steps.join(", "))
            }
            ValidationError::InvalidFilter { message, .. } => {
                write!(f, "Invalid filter: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

/// Failure signal returned by a single validation step
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation step failed with code '{code}'")]
pub struct StepFailure {
    pub code: String,
}

impl StepFailure {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors in controller or resource configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown resource: {resource}")]
    UnknownResource { resource: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised while applying filters to a store
#[derive(Debug)]
pub enum StorageError {
    /// Query execution error
    QueryError { backend: String, message: String },

    /// Backend not available
    Unavailable { backend: String },

    /// A whitelisted filter whose operand does not fit the field
    InvalidFilter { field: String, message: String },
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::QueryError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            StorageError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::Unavailable { backend } => {
                write!(f, "Storage backend '{}' is unavailable", backend)
            }
            StorageError::InvalidFilter { field, message } => {
                write!(f, "Invalid filter on '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors in transport-level parameters outside the validated filter set
#[derive(Debug)]
pub enum RequestError {
    MissingParameter { parameter: String },
    InvalidParameter { parameter: String, value: String },
}

impl RequestError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::MissingParameter { .. } => "MISSING_PARAMETER",
            RequestError::InvalidParameter { .. } => "INVALID_PARAMETER",
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingParameter { parameter } => {
                write!(f, "Missing required parameter: {}", parameter)
            }
            RequestError::InvalidParameter { parameter, value } => {
                write!(f, "Invalid value '{}' for parameter '{}'", value, parameter)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::Request(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StorageError>() {
            Ok(storage) => ApiError::Storage(storage),
            Err(other) => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_step_errors_use_error_class_as_code() {
        let err = ApiError::Validation(ValidationError::StepErrors {
            error_class: Some("Restaurant List Errors".into()),
            errors: ErrorReport::Compact(IndexMap::from([("order".into(), "E1".into())])),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "Restaurant List Errors");

        let body = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(body["errors"], serde_json::json!({"order": "E1"}));
        assert_eq!(body["response_code"], 400);
    }

    #[test]
    fn test_step_errors_without_class() {
        let err = ValidationError::StepErrors {
            error_class: None,
            errors: ErrorReport::Full(IndexMap::from([(
                "page".to_string(),
                vec!["A".to_string(), "B".to_string()],
            )])),
        };
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "Validation failed for: page");
    }

    #[test]
    fn test_anyhow_storage_error_is_recovered() {
        let err: anyhow::Error = StorageError::Unavailable {
            backend: "memory".into(),
        }
        .into();
        let api: ApiError = err.into();
        assert_eq!(api.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_config_parse_error_display() {
        let err = ConfigError::ParseError {
            file: Some("resources.yaml".into()),
            message: "bad".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse config file 'resources.yaml': bad"
        );
    }

    #[test]
    fn test_step_failure_display() {
        assert_eq!(
            StepFailure::new("ORDER_REQUIRED").to_string(),
            "validation step failed with code 'ORDER_REQUIRED'"
        );
    }
}
