//! # Configuration Reload
//!
//! `POST /config/reload` re-reads the pricing file. A file that fails to
//! parse or validate leaves the running tables untouched.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::config::ConfigError;
use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub reloaded: bool,
    pub config_loaded_at: String,
}

pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let loaded_at = state.engine.reload().await.map_err(reload_error)?;
    Ok(Json(ReloadResponse {
        reloaded: true,
        config_loaded_at: loaded_at.to_rfc3339(),
    }))
}

fn reload_error(err: ConfigError) -> ApiError {
    ApiError::new(ErrorCode::ConfigurationError, err.to_string())
}
