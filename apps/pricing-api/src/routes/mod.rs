//! HTTP route handlers, one module per endpoint group.

pub mod admin;
pub mod health;
pub mod optimize;
pub mod pricing;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::ApiError;

/// Unwraps a JSON body, mapping Axum's rejection to a 422.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}
