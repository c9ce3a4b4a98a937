//! # Mitre Pricing API
//!
//! Axum service exposing the mitre-core JSON contracts.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /optimize/frame      length / chop / mixed for artwork dimensions │
//! │  POST /optimize/footage    same, for an explicit footage                │
//! │  POST /optimize/batch      one plan per distinct moulding               │
//! │  POST /pricing/calculate   full order quote                            │
//! │  POST /config/reload       swap in freshly validated tables            │
//! │  GET  /health              liveness + config timestamp                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info_span;

pub use error::{ApiError, ErrorCode};
pub use state::{AppState, EngineHandle};

/// Builds the router with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/optimize/frame", post(routes::optimize::optimize_frame))
        .route("/optimize/footage", post(routes::optimize::optimize_footage))
        .route("/optimize/batch", post(routes::optimize::optimize_batch))
        .route("/pricing/calculate", post(routes::pricing::calculate))
        .route("/config/reload", post(routes::admin::reload))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            info_span!(
                "http",
                request_id = %uuid::Uuid::new_v4(),
                method = %request.method(),
                path = %request.uri().path(),
            )
        }))
        .with_state(state)
}
