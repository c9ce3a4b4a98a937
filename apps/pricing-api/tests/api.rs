//! HTTP-level tests: build the router, drive it with `oneshot`, inspect JSON.

use std::io::Write;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mitre_core::engine::QuoteRequest;
use mitre_core::optimizer::FootageSource;
use mitre_core::{OrderGeometry, PricingConfig};
use mitre_pricing_api::{app, AppState, EngineHandle};
use serde_json::{json, Value};
use tower::ServiceExt;

fn default_state() -> AppState {
    AppState::new(EngineHandle::from_config(PricingConfig::default(), None).unwrap())
}

async fn post_json(state: AppState, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn post_empty(state: AppState, uri: &str) -> (StatusCode, Value) {
    let response = app(state)
        .oneshot(Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// =============================================================================
// Optimization
// =============================================================================

#[tokio::test]
async fn test_optimize_footage_recommends_mixed() {
    let (status, body) = post_json(
        default_state(),
        "/optimize/footage",
        json!({ "itemIdentifier": "MLD-2041", "footageNeeded": 12.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemNumber"], "MLD-2041");
    assert_eq!(body["lengthOption"]["sticksNeeded"], 2);
    assert_eq!(body["lengthOption"]["totalCost"], 76.0);
    assert_eq!(body["chopOption"]["totalCost"], 78.0);
    assert_eq!(body["mixedOption"]["fullSticks"], 1);
    assert_eq!(body["mixedOption"]["totalCost"], 54.25);
    assert_eq!(body["recommendation"]["method"], "mixed");
    assert_eq!(body["recommendation"]["savings"], 21.75);
    assert!(body["recommendation"].get("alert").is_none());
}

#[tokio::test]
async fn test_optimize_frame_uses_dimensions() {
    let geometry = OrderGeometry::new(16.0, 20.0, 2.0).unwrap();
    let expected = FootageSource::ByDimensions(geometry).footage_needed().unwrap();

    let (status, body) = post_json(
        default_state(),
        "/optimize/frame",
        json!({
            "itemIdentifier": "oak-classic",
            "artworkWidth": 16.0,
            "artworkHeight": 20.0,
            "matWidth": 2.0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemNumber"], "MLD-2041");
    assert_eq!(body["footageNeeded"].as_f64(), Some(expected));
}

#[tokio::test]
async fn test_optimize_batch_merges_same_moulding() {
    let (status, body) = post_json(
        default_state(),
        "/optimize/batch",
        json!({
            "items": [
                { "itemIdentifier": "MLD-3310", "footageNeeded": 4.0 },
                { "itemIdentifier": "MLD-2041", "footageNeeded": 6.0 },
                { "itemIdentifier": "mld-2041", "footageNeeded": 6.0 }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["itemNumber"], "MLD-2041");
    assert_eq!(results[0]["footageNeeded"], 12.0);
    assert_eq!(results[1]["itemNumber"], "MLD-3310");
}

#[tokio::test]
async fn test_optimize_unknown_frame_is_404() {
    let (status, body) = post_json(
        default_state(),
        "/optimize/footage",
        json!({ "itemIdentifier": "NOPE-1", "footageNeeded": 5.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_optimize_rejects_bad_footage() {
    let (status, body) = post_json(
        default_state(),
        "/optimize/footage",
        json!({ "itemIdentifier": "MLD-2041", "footageNeeded": 0.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = post_json(
        default_state(),
        "/optimize/footage",
        json!({ "itemIdentifier": "MLD-2041" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_json_is_422() {
    let response = app(default_state())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/optimize/footage")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, body) = read(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_JSON");
}

// =============================================================================
// Pricing
// =============================================================================

#[tokio::test]
async fn test_calculate_matches_engine_quote() {
    let engine = PricingConfig::default().into_engine().unwrap();
    let quote = engine
        .quote(&QuoteRequest {
            frame_id: Some("MLD-2041".to_string()),
            mat_id: Some("none".to_string()),
            glass_id: Some("regular".to_string()),
            backing_id: None,
            geometry: OrderGeometry::new(16.0, 20.0, 0.0).unwrap(),
            quantity: 2,
        })
        .unwrap();
    let rounded = quote.order.rounded().unwrap();

    let (status, body) = post_json(
        default_state(),
        "/pricing/calculate",
        json!({
            "frameId": "MLD-2041",
            "matColorId": "none",
            "glassOptionId": "regular",
            "artworkWidth": 16.0,
            "artworkHeight": 20.0,
            "quantity": 2
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matPrice"], 0.0);
    assert_eq!(body["backingPrice"], 0.0);
    // base fee plus glass cutting, twice
    assert_eq!(body["laborCost"], 60.0);
    assert_eq!(body["quantity"], 2);
    assert_eq!(body["totalPrice"].as_f64(), Some(rounded.total.to_dollars()));
    assert!(body.get("wholesalePrices").is_none());
}

#[tokio::test]
async fn test_calculate_with_wholesale_prices() {
    let (status, body) = post_json(
        default_state(),
        "/pricing/calculate",
        json!({
            "frameId": "MLD-3310",
            "matColorId": "white-core",
            "artworkWidth": 8.0,
            "artworkHeight": 10.0,
            "matWidth": 2.0,
            "includeWholesalePrices": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["wholesalePrices"]["frame"].as_f64().unwrap() > 0.0);
    assert_eq!(body["laborRates"]["baseFee"], 25.0);
    assert_eq!(body["laborCost"], 35.0);
}

#[tokio::test]
async fn test_calculate_unknown_glass_is_404() {
    let (status, body) = post_json(
        default_state(),
        "/pricing/calculate",
        json!({
            "glassOptionId": "diamond",
            "artworkWidth": 8.0,
            "artworkHeight": 10.0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["message"].as_str().unwrap().contains("diamond"));
}

// =============================================================================
// Health & Reload
// =============================================================================

#[tokio::test]
async fn test_health() {
    let response = app(default_state())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let (status, body) = read(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["frames"], 3);
    assert_eq!(body["mats"], 2);
    assert_eq!(body["glass"], 3);
    assert_eq!(body["backing"], 1);
    assert!(body["configLoadedAt"].is_string());
}

#[tokio::test]
async fn test_health_reports_reloaded_catalog() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let state = AppState::new(
        EngineHandle::from_config(PricingConfig::default(), Some(file.path().to_path_buf()))
            .unwrap(),
    );

    std::fs::write(
        file.path(),
        r#"
        [[catalog.frames]]
        id = "walnut"
        item_number = "MLD-7000"
        name = "Walnut"
        length_cost_per_foot = 5.0
        chop_cost_per_foot = 7.5
        "#,
    )
    .unwrap();
    let (status, reload) = post_empty(state.clone(), "/config/reload").await;
    assert_eq!(status, StatusCode::OK);

    let response = app(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let (_, body) = read(response).await;

    assert_eq!(body["configLoadedAt"], reload["configLoadedAt"]);
    assert_eq!(body["frames"], 1);
    assert_eq!(body["mats"], 0);
    assert_eq!(body["glass"], 0);
}

#[tokio::test]
async fn test_reload_applies_new_tax_rate() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"").unwrap();
    let state = AppState::new(
        EngineHandle::from_config(PricingConfig::default(), Some(file.path().to_path_buf()))
            .unwrap(),
    );

    std::fs::write(file.path(), "tax_rate_bps = 1000\n").unwrap();
    let (status, body) = post_empty(state.clone(), "/config/reload").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reloaded"], true);

    let (_, quote) = post_json(
        state,
        "/pricing/calculate",
        json!({ "frameId": "MLD-2041", "artworkWidth": 8.0, "artworkHeight": 10.0 }),
    )
    .await;
    let subtotal = quote["subtotal"].as_f64().unwrap();
    let tax = quote["tax"].as_f64().unwrap();
    assert!((tax - subtotal * 0.10).abs() <= 0.01);
}

#[tokio::test]
async fn test_failed_reload_keeps_serving() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let state = AppState::new(
        EngineHandle::from_config(PricingConfig::default(), Some(file.path().to_path_buf()))
            .unwrap(),
    );

    std::fs::write(file.path(), "[procurement]\nwaste_alert_percent = 400.0\n").unwrap();
    let (status, body) = post_empty(state.clone(), "/config/reload").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");

    let (status, _) = post_json(
        state,
        "/optimize/footage",
        json!({ "itemIdentifier": "MLD-2041", "footageNeeded": 12.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
