//! Health, stats, fallback and response finalisation

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use iotc_tracing::{Counter, Gauge};
use serde::Serialize;
use serde_json::json;

use super::envelope::Envelope;
use crate::error::{ErrorDetail, INTERNAL_MESSAGE};
use crate::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "message": "Server is running" }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub uptime_seconds: u64,
    pub attributes: AttributeStats,
    pub telemetry: TelemetryStats,
    pub catalog: CatalogStats,
    pub failed_requests: Counter,
}

#[derive(Debug, Serialize)]
pub struct AttributeStats {
    pub stored: usize,
    pub writes: Counter,
    pub deletes: Counter,
}

#[derive(Debug, Serialize)]
pub struct TelemetryStats {
    pub stored: Gauge,
    pub written: Counter,
    pub deleted: Counter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub asset_profiles: usize,
    pub device_profiles: usize,
    pub assets: usize,
    pub devices: usize,
}

pub async fn stats(State(state): State<AppState>) -> Json<Envelope<StatsResponse>> {
    Json(Envelope::data(StatsResponse {
        uptime_seconds: state.uptime_seconds(),
        attributes: AttributeStats {
            stored: state.attributes.len(),
            writes: state.attributes.writes().clone(),
            deletes: state.attributes.deletes().clone(),
        },
        telemetry: TelemetryStats {
            stored: state.telemetry.stored().clone(),
            written: state.telemetry.written().clone(),
            deleted: state.telemetry.deleted().clone(),
        },
        catalog: CatalogStats {
            asset_profiles: state.asset_profiles.len(),
            device_profiles: state.device_profiles.len(),
            assets: state.assets.len(),
            devices: state.devices.len(),
        },
        failed_requests: state.failed_requests.clone(),
    }))
}

pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route not found" })),
    )
}

/// Count failed requests and, in development, expose internal error detail.
pub async fn finalize_response(State(state): State<AppState>, mut response: Response) -> Response {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        state.failed_requests.inc();
    }

    let detail = response.extensions_mut().remove::<ErrorDetail>();
    match detail {
        Some(ErrorDetail(detail)) if state.config.environment.is_development() => (
            status,
            Json(json!({
                "success": false,
                "message": INTERNAL_MESSAGE,
                "error": detail
            })),
        )
            .into_response(),
        _ => response,
    }
}
