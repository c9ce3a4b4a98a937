//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use mitre_core::MaterialClass;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub config_loaded_at: String,
    pub frames: usize,
    pub mats: usize,
    pub glass: usize,
    pub backing: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (engine, loaded_at) = state.engine.current().await;
    let catalog = engine.catalog();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        config_loaded_at: loaded_at.to_rfc3339(),
        frames: catalog.frames().len(),
        mats: catalog.sheet_count(MaterialClass::Mat),
        glass: catalog.sheet_count(MaterialClass::Glass),
        backing: catalog.sheet_count(MaterialClass::Backing),
    })
}
