//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Error conversions work correctly

use axum::http::StatusCode;
use axum::response::IntoResponse;
use indexmap::IndexMap;
use restaurant_choices::prelude::*;
use serde_json::{Value, json};

async fn body_of(err: ApiError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_validation_errors_return_400() {
        let err = ApiError::Validation(ValidationError::InvalidFilter {
            error_class: None,
            message: "bad".into(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_request_errors_return_400() {
        let err = ApiError::Request(RequestError::MissingParameter {
            parameter: "userId".into(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_errors() {
        let invalid = ApiError::Storage(StorageError::InvalidFilter {
            field: "idRestaurant__gt".into(),
            message: "'abc' is not a valid value for this field".into(),
        });
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.error_code(), "INVALID_FILTER");

        let unavailable = ApiError::Storage(StorageError::Unavailable {
            backend: "memory".into(),
        });
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let query = ApiError::Storage(StorageError::QueryError {
            backend: "memory".into(),
            message: "lock poisoned".into(),
        });
        assert_eq!(query.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_config_and_internal_return_500() {
        let config = ApiError::Config(ConfigError::UnknownResource {
            resource: "menu".into(),
        });
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(config.error_code(), "CONFIG_ERROR");

        let internal = ApiError::Internal("boom".into());
        assert_eq!(internal.error_code(), "INTERNAL_ERROR");
    }
}

// =============================================================================
// Response Body Tests
// =============================================================================

mod response_tests {
    use super::*;

    #[tokio::test]
    async fn test_step_errors_body() {
        let err = ApiError::Validation(ValidationError::StepErrors {
            error_class: Some("Restaurant List Errors".into()),
            errors: ErrorReport::Compact(IndexMap::from([(
                "userId".to_string(),
                "USER_ID".to_string(),
            )])),
        });

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "Restaurant List Errors");
        assert_eq!(body["response_code"], 400);
        assert_eq!(body["errors"], json!({"userId": "USER_ID"}));
        assert_eq!(body["message"], "Validation failed for: userId");
    }

    #[tokio::test]
    async fn test_request_error_body_has_no_errors_field() {
        let err = ApiError::Request(RequestError::InvalidParameter {
            parameter: "userId".into(),
            value: "abc".into(),
        });

        let (_, body) = body_of(err).await;
        assert_eq!(body["code"], "INVALID_PARAMETER");
        assert_eq!(body["message"], "Invalid value 'abc' for parameter 'userId'");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_body() {
        let (status, body) = body_of(ApiError::Internal("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal error: boom");
        assert_eq!(body["response_code"], 500);
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[test]
    fn test_from_impls() {
        let err: ApiError = RequestError::MissingParameter {
            parameter: "userId".into(),
        }
        .into();
        assert!(matches!(err, ApiError::Request(_)));

        let err: ApiError = ConfigError::IoError {
            message: "missing".into(),
        }
        .into();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_anyhow_keeps_storage_errors() {
        let err: ApiError = anyhow::Error::new(StorageError::InvalidFilter {
            field: "city".into(),
            message: "bad".into(),
        })
        .into();
        assert!(matches!(err, ApiError::Storage(StorageError::InvalidFilter { .. })));

        let err: ApiError = anyhow::anyhow!("something else").into();
        assert!(matches!(err, ApiError::Internal(ref m) if m == "something else"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err = ApiError::Config(ConfigError::UnknownResource {
            resource: "menu".into(),
        });
        assert_eq!(err.source().unwrap().to_string(), "Unknown resource: menu");
        assert!(ApiError::Internal("x".into()).source().is_none());
    }
}
