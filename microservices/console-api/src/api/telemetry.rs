//! Telemetry endpoints
//!
//! The timeseries GET answers with the bare key-to-series map, not the
//! success envelope the other endpoints use.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use iotc_store::{value::into_object, SampleFilter, TimeseriesQuery, TimeseriesResult};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::envelope::Envelope;
use super::params;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesParams {
    keys: Option<String>,
    start_ts: Option<String>,
    end_ts: Option<String>,
    limit: Option<String>,
    /// Accepted from clients but unused: samples are never aggregated.
    #[allow(dead_code)]
    interval: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRangeParams {
    keys: Option<String>,
    start_ts: Option<String>,
    end_ts: Option<String>,
}

fn sample_filter(
    keys: Option<String>,
    start_ts: Option<String>,
    end_ts: Option<String>,
) -> ApiResult<SampleFilter> {
    Ok(SampleFilter {
        keys: params::keys(keys),
        start_ts: params::timestamp("startTs", start_ts)?,
        end_ts: params::timestamp("endTs", end_ts)?,
    })
}

pub async fn query(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    query_params: Result<Query<TimeseriesParams>, QueryRejection>,
) -> ApiResult<Json<TimeseriesResult>> {
    let Path((entity_type, entity_id)) = path?;
    let Query(query_params) = query_params?;
    let entity = params::entity_ref(&entity_type, entity_id)?;
    let query = TimeseriesQuery {
        limit: params::limit(query_params.limit)?,
        filter: sample_filter(query_params.keys, query_params.start_ts, query_params.end_ts)?,
    };

    Ok(Json(state.telemetry.query(&entity, &query)))
}

pub async fn save(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let Path((entity_type, entity_id)) = path?;
    let entity = params::entity_ref(&entity_type, entity_id)?;
    let Json(body) = body?;
    let values = into_object(body)?;

    let ts = state.telemetry.save(&entity, &values)?;
    info!(entity = %entity, ts, keys = values.len(), "Telemetry saved");

    Ok(Json(Envelope::message("Telemetry data saved successfully")))
}

pub async fn delete_range(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    query_params: Result<Query<DeleteRangeParams>, QueryRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let Path((entity_type, entity_id)) = path?;
    let Query(query_params) = query_params?;
    let entity = params::entity_ref(&entity_type, entity_id)?;
    let filter = sample_filter(query_params.keys, query_params.start_ts, query_params.end_ts)?;

    let removed = state.telemetry.delete_range(&entity, &filter);
    info!(entity = %entity, removed, "Telemetry deleted");

    Ok(Json(Envelope::message(format!("Deleted {} telemetry records", removed))))
}
