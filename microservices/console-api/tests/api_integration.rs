//! Integration tests for the Console API
//!
//! Drives the full router in-process:
//! - attribute scope replace and point delete
//! - telemetry windowed queries and range deletes
//! - catalog CRUD for profiles, assets and devices
//! - envelope, fallback and error mapping

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{middleware, routing::get, Router};
use console_api::api::system;
use console_api::{create_router, ApiError, AppState};
use http_body_util::BodyExt;
use iotc_core::{EntityRef, Environment, IotcError, ServiceConfig};
use serde_json::{json, Map, Value};
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

fn app() -> (AppState, Router) {
    let state = AppState::default();
    let router = create_router(state.clone());
    (state, router)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        _ => panic!("expected object"),
    }
}

fn series_ts(body: &Value, key: &str) -> Vec<i64> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["ts"].as_i64().unwrap())
        .collect()
}

fn seed_temperature(state: &AppState, entity: &EntityRef) {
    for ts in [100, 200, 300, 400, 500] {
        state
            .telemetry
            .save_at(entity, &object(json!({"temperature": ts, "humidity": ts / 10})), ts)
            .unwrap();
    }
}

// =============================================================================
// Health & routing
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (_, app) = app();
    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK", "message": "Server is running"}));
}

#[tokio::test]
async fn test_unknown_route() {
    let (_, app) = app();
    let (status, body) = get_json(&app, "/api/gateways").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Route not found"}));
}

#[tokio::test]
async fn test_malformed_url_answers_with_envelope() {
    let (_, app) = app();

    for (method, uri) in [
        ("GET", "/api/assets/%FF"),
        ("GET", "/api/telemetry/DEVICE/%FF/values/timeseries"),
        ("DELETE", "/api/attributes/DEVICE/%FF/SERVER_SCOPE/k"),
        ("GET", "/api/telemetry/DEVICE/d1/values/timeseries?keys=a&keys=b"),
        ("GET", "/api/assets?search=a&search=b"),
    ] {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(
            response.headers()["content-type"],
            "application/json",
            "{} {}",
            method,
            uri
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }
}

// =============================================================================
// Attributes
// =============================================================================

#[tokio::test]
async fn test_attribute_save_replaces_scope() {
    let (_, app) = app();
    let uri = "/api/attributes/DEVICE/d1/SERVER_SCOPE";

    let (status, body) = send(&app, "POST", uri, Some(json!({"a": 1, "b": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Attributes saved successfully"}));

    send(&app, "POST", uri, Some(json!({"c": 3}))).await;

    let (status, body) = get_json(
        &app,
        "/api/attributes?entityId=d1&entityType=DEVICE&scope=SERVER_SCOPE",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["data"][0]["key"], "c");
    assert_eq!(body["data"][0]["value"], 3);
    assert_eq!(body["data"][0]["entityType"], "DEVICE");
    assert!(body["data"][0]["lastUpdateTs"].is_i64());
}

#[tokio::test]
async fn test_attribute_query_filters() {
    let (_, app) = app();
    send(&app, "POST", "/api/attributes/DEVICE/d1/CLIENT_SCOPE", Some(json!({"fw": "1.2"}))).await;
    send(&app, "POST", "/api/attributes/ASSET/a1/SHARED_SCOPE", Some(json!({"floor": 2}))).await;

    let (_, all) = get_json(&app, "/api/attributes").await;
    assert_eq!(all["total"], 2);

    let (_, assets) = get_json(&app, "/api/attributes?entityType=ASSET").await;
    assert_eq!(assets["total"], 1);
    assert_eq!(assets["data"][0]["key"], "floor");

    let (_, blank) = get_json(&app, "/api/attributes?entityId=&scope=").await;
    assert_eq!(blank["total"], 2);

    let (status, body) = get_json(&app, "/api/attributes?scope=EVERYWHERE").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_attribute_delete() {
    let (_, app) = app();
    send(&app, "POST", "/api/attributes/ASSET/a1/SERVER_SCOPE", Some(json!({"x": true, "y": "z"}))).await;

    let (status, body) = send(&app, "DELETE", "/api/attributes/ASSET/a1/SERVER_SCOPE/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Attribute not found"}));

    let (status, body) = send(&app, "DELETE", "/api/attributes/ASSET/a1/SERVER_SCOPE/x", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Attribute deleted successfully");

    let (_, remaining) = get_json(&app, "/api/attributes?entityId=a1").await;
    assert_eq!(remaining["total"], 1);
    assert_eq!(remaining["data"][0]["key"], "y");
}

#[tokio::test]
async fn test_attribute_rejects_bad_input() {
    let (_, app) = app();

    let (status, _) = send(&app, "POST", "/api/attributes/SENSOR/s1/SERVER_SCOPE", Some(json!({"a": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/attributes/DEVICE/d1/ANY_SCOPE", Some(json!({"a": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/api/attributes/DEVICE/d1/SERVER_SCOPE", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .method("POST")
        .uri("/api/attributes/DEVICE/d1/SERVER_SCOPE")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Telemetry
// =============================================================================

#[tokio::test]
async fn test_telemetry_round_trip_is_bare_map() {
    let (_, app) = app();

    let (status, body) = send(&app, "POST", "/api/telemetry/DEVICE/d1", Some(json!({"x": 42, "on": false}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Telemetry data saved successfully");

    let (status, body) = get_json(&app, "/api/telemetry/DEVICE/d1/values/timeseries?keys=x").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("success").is_none());
    assert_eq!(body["x"][0]["value"], "42");
    assert!(body.get("on").is_none());

    let (_, body) = get_json(&app, "/api/telemetry/DEVICE/d1/values/timeseries").await;
    assert_eq!(body["on"][0]["value"], "false");
    assert_eq!(body["x"][0]["ts"], body["on"][0]["ts"]);
}

#[tokio::test]
async fn test_telemetry_limit_and_bounds() {
    let (state, app) = app();
    seed_temperature(&state, &EntityRef::device("d1"));

    let (_, body) = get_json(
        &app,
        "/api/telemetry/DEVICE/d1/values/timeseries?keys=temperature&limit=2",
    )
    .await;
    assert_eq!(series_ts(&body, "temperature"), vec![400, 500]);
    assert_eq!(body["temperature"][1]["value"], "500");

    let (_, body) = get_json(
        &app,
        "/api/telemetry/DEVICE/d1/values/timeseries?startTs=200&endTs=400",
    )
    .await;
    assert_eq!(series_ts(&body, "temperature"), vec![200, 300, 400]);
    assert_eq!(series_ts(&body, "humidity"), vec![200, 300, 400]);

    let (_, body) = get_json(
        &app,
        "/api/telemetry/DEVICE/d1/values/timeseries?keys=pressure",
    )
    .await;
    assert_eq!(body, json!({}));

    let (_, body) = get_json(&app, "/api/telemetry/ASSET/d1/values/timeseries").await;
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_telemetry_delete_range() {
    let (state, app) = app();
    seed_temperature(&state, &EntityRef::device("d1"));
    seed_temperature(&state, &EntityRef::device("d2"));

    let uri = "/api/telemetry/DEVICE/d1/timeseries/delete?keys=temperature&startTs=100&endTs=200";
    let (status, body) = send(&app, "DELETE", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Deleted 2 telemetry records"}));

    let (_, body) = send(&app, "DELETE", uri, None).await;
    assert_eq!(body["message"], "Deleted 0 telemetry records");

    let (_, d1) = get_json(&app, "/api/telemetry/DEVICE/d1/values/timeseries").await;
    assert_eq!(series_ts(&d1, "temperature"), vec![300, 400, 500]);
    assert_eq!(series_ts(&d1, "humidity").len(), 5);

    let (_, d2) = get_json(&app, "/api/telemetry/DEVICE/d2/values/timeseries").await;
    assert_eq!(series_ts(&d2, "temperature").len(), 5);
}

#[tokio::test]
async fn test_telemetry_rejects_bad_input() {
    let (state, app) = app();

    let (status, body) = send(&app, "POST", "/api/telemetry/DEVICE/d1", Some(json!({"x": 1, "y": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("'y'"));
    assert!(state.telemetry.is_empty());

    let (status, _) = get_json(&app, "/api/telemetry/DEVICE/d1/values/timeseries?startTs=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&app, "/api/telemetry/DEVICE/d1/values/timeseries?limit=-3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/api/telemetry/DEVICE/d1/timeseries/delete?endTs=x", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&app, "/api/telemetry/GATEWAY/g1/values/timeseries").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_asset_crud() {
    let (_, app) = app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/assets",
        Some(json!({"name": "Boiler", "description": "Basement boiler", "type": "hvac", "assetProfileId": "p1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Asset created successfully");
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["attributes"], json!({}));

    let (status, fetched) = get_json(&app, &format!("/api/assets/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["name"], "Boiler");

    let (_, listed) = get_json(&app, "/api/assets?search=BASEMENT&type=hvac").await;
    assert_eq!(listed["total"], 1);
    let (_, listed) = get_json(&app, "/api/assets?type=power").await;
    assert_eq!(listed["total"], 0);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/assets/{}", id),
        Some(json!({"label": "B-1", "id": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Asset updated successfully");
    assert_eq!(updated["data"]["label"], "B-1");
    assert_eq!(updated["data"]["id"], id.as_str());
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);

    let (status, body) = send(&app, "DELETE", &format!("/api/assets/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Asset deleted successfully");

    let (status, body) = get_json(&app, &format!("/api/assets/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Asset not found"}));

    let (status, _) = send(&app, "PUT", &format!("/api/assets/{}", id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_validation() {
    let (_, app) = app();

    let (status, body) = send(&app, "POST", "/api/devices", Some(json!({"description": "nameless"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("name"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/device-profiles",
        Some(json!({"name": "Gateway", "transportType": "ZIGBEE"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, created) = send(&app, "POST", "/api/devices", Some(json!({"name": "Meter"}))).await;
    let id = created["data"]["id"].as_str().unwrap();
    let (status, _) = send(&app, "PUT", &format!("/api/devices/{}", id), Some(json!({"isActive": "yes"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_device_and_profiles() {
    let (_, app) = app();

    let (_, profile) = send(
        &app,
        "POST",
        "/api/device-profiles",
        Some(json!({"name": "Thermostat", "deviceType": "sensor", "transportType": "MQTT"})),
    )
    .await;
    assert_eq!(profile["data"]["transportType"], "MQTT");
    assert_eq!(profile["data"]["alarmRules"], json!([]));
    send(&app, "POST", "/api/device-profiles", Some(json!({"name": "Relay", "deviceType": "actuator"}))).await;

    let (_, sensors) = get_json(&app, "/api/device-profiles?deviceType=sensor").await;
    assert_eq!(sensors["total"], 1);
    assert_eq!(sensors["data"][0]["name"], "Thermostat");

    let (_, asset_profile) = send(
        &app,
        "POST",
        "/api/asset-profiles",
        Some(json!({"name": "Building", "type": "site"})),
    )
    .await;
    assert_eq!(asset_profile["message"], "Asset profile created successfully");
    let (_, sites) = get_json(&app, "/api/asset-profiles?category=site").await;
    assert_eq!(sites["total"], 1);

    let (status, device) = send(
        &app,
        "POST",
        "/api/devices",
        Some(json!({"name": "T-100", "deviceProfileId": profile["data"]["id"], "type": "sensor"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(device["data"]["isActive"], true);
    assert_eq!(device["data"]["credentials"]["credentialsType"], "ACCESS_TOKEN");
    assert!(device["data"]["credentials"]["credentialsId"]
        .as_str()
        .unwrap()
        .starts_with("token_"));

    let (status, body) = get_json(&app, "/api/device-profiles/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Device profile not found");
}

// =============================================================================
// Stats & error detail
// =============================================================================

#[tokio::test]
async fn test_stats_track_store_activity() {
    let (_, app) = app();
    send(&app, "POST", "/api/attributes/DEVICE/d1/SERVER_SCOPE", Some(json!({"a": 1, "b": 2}))).await;
    send(&app, "POST", "/api/telemetry/DEVICE/d1", Some(json!({"t": 20}))).await;
    send(&app, "POST", "/api/assets", Some(json!({"name": "Site"}))).await;
    get_json(&app, "/api/nowhere").await;

    let (status, body) = get_json(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"];
    assert_eq!(stats["attributes"]["stored"], 2);
    assert_eq!(stats["attributes"]["writes"], 2);
    assert_eq!(stats["telemetry"]["stored"], 1);
    assert_eq!(stats["catalog"]["assets"], 1);
    assert_eq!(stats["failedRequests"], 1);
}

fn failing_router(environment: Environment) -> Router {
    let state = AppState::new(ServiceConfig {
        environment,
        ..ServiceConfig::default()
    });
    Router::new()
        .route(
            "/boom",
            get(|| async { ApiError(IotcError::Internal("store unavailable".into())) }),
        )
        .layer(middleware::map_response_with_state(
            state.clone(),
            system::finalize_response,
        ))
        .with_state(state)
}

#[tokio::test]
async fn test_internal_detail_hidden_in_production() {
    let app = failing_router(Environment::Production);
    let (status, body) = get_json(&app, "/boom").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"success": false, "message": "Something went wrong!", "error": "Internal server error"})
    );
}

#[tokio::test]
async fn test_internal_detail_shown_in_development() {
    let app = failing_router(Environment::Development);
    let (status, body) = get_json(&app, "/boom").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("store unavailable"));
}
