//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Pricing API                        │
//! │                                                                         │
//! │  Handler                                                                │
//! │  Result<Json<T>, ApiError>                                              │
//! │         │                                                               │
//! │         ├── JsonRejection ─────────────────────► 422 INVALID_JSON       │
//! │         ├── CoreError::InvalidInput ───────────► 422 VALIDATION_ERROR   │
//! │         ├── CoreError::LookupNotFound ─────────► 404 NOT_FOUND          │
//! │         └── CoreError::InvalidConfiguration ───► 500 CONFIGURATION_ERROR│
//! │                                                                         │
//! │  Body: { "error": { "code": "NOT_FOUND", "message": "..." } }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mitre_core::CoreError;
use serde::Serialize;

/// Error returned from every handler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown frame, mat, glass or backing identifier
    NotFound,

    /// A field failed validation
    ValidationError,

    /// The request body was not valid JSON for the endpoint
    InvalidJson,

    /// The loaded pricing tables are unusable
    ConfigurationError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::InvalidJson => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::ConfigurationError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Conversions
// =============================================================================

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(_) => ApiError::validation(err.to_string()),
            CoreError::LookupNotFound { .. } => ApiError::not_found(err.to_string()),
            CoreError::InvalidConfiguration(_) => {
                tracing::error!(error = %err, "Pricing configuration rejected a request");
                ApiError::new(ErrorCode::ConfigurationError, err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorCode::InvalidJson, rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a ApiError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(ErrorEnvelope { error: &self })).into_response()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mitre_core::ValidationError;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::not_found("frame", "XYZ").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "frame not found: XYZ");

        let err: ApiError = CoreError::from(ValidationError::MustBePositive {
            field: "footageNeeded".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.code.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = CoreError::config("gap in frame brackets").into();
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ApiError::not_found("gone")).unwrap();
        assert_eq!(json, r#"{"code":"NOT_FOUND","message":"gone"}"#);
    }
}
