//! # Price Calculation Endpoint
//!
//! `POST /pricing/calculate` prices a whole framing order: frame, optional
//! mat / glass / backing, labor, oversize surcharge and tax.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mitre_core::contract::{PriceCalculationRequest, PriceCalculationResponse};
use tracing::debug;

use super::json_body;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn calculate(
    State(state): State<AppState>,
    body: Result<Json<PriceCalculationRequest>, JsonRejection>,
) -> Result<Json<PriceCalculationResponse>, ApiError> {
    let request = json_body(body)?;
    let include_wholesale = request.include_wholesale_prices;
    let quote_request = request.into_quote_request()?;

    let engine = state.engine.snapshot().await;
    let quote = engine.quote(&quote_request)?;
    let response = PriceCalculationResponse::from_quote(&quote, include_wholesale)?;

    debug!(
        quantity = response.quantity,
        total = %response.total_price,
        "Order priced"
    );
    Ok(Json(response))
}
