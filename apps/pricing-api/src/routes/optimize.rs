//! # Procurement Optimization Endpoints
//!
//! ```text
//! POST /optimize/frame    {itemIdentifier, artworkWidth, artworkHeight, matWidth}
//! POST /optimize/footage  {itemIdentifier, footageNeeded}
//! POST /optimize/batch    {items: [...]}
//! ```
//!
//! All three answer with the same option/recommendation shape; batch wraps
//! one result per distinct item number.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mitre_core::contract::{
    BatchOptimizeRequest, BatchOptimizeResponse, OptimizeRequest, OptimizeResponse,
};
use mitre_core::optimizer::FootageSource;
use tracing::debug;

use super::json_body;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn optimize_frame(
    State(state): State<AppState>,
    body: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let request = json_body(body)?;
    let (item, source) = request.by_dimensions()?;
    optimize_one(&state, &item, source).await
}

pub async fn optimize_footage(
    State(state): State<AppState>,
    body: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let request = json_body(body)?;
    let (item, source) = request.by_footage()?;
    optimize_one(&state, &item, source).await
}

pub async fn optimize_batch(
    State(state): State<AppState>,
    body: Result<Json<BatchOptimizeRequest>, JsonRejection>,
) -> Result<Json<BatchOptimizeResponse>, ApiError> {
    let request = json_body(body)?;
    if request.items.is_empty() {
        return Err(ApiError::validation("items must not be empty"));
    }
    let items = request.resolve()?;

    let engine = state.engine.snapshot().await;
    let plans = engine.optimize_frames(&items)?;
    debug!(requested = items.len(), distinct = plans.len(), "Batch optimized");

    let results = plans
        .iter()
        .map(OptimizeResponse::from_plan)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(BatchOptimizeResponse { results }))
}

async fn optimize_one(
    state: &AppState,
    item: &str,
    source: FootageSource,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let engine = state.engine.snapshot().await;
    let plan = engine.optimize_frame(item, source)?;
    Ok(Json(OptimizeResponse::from_plan(&plan)?))
}
