//! Attribute endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use iotc_core::{AttributeScope, EntityType};
use iotc_store::{value::into_object, AttributeFilter, AttributeRecord};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::envelope::Envelope;
use super::params;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeQueryParams {
    entity_id: Option<String>,
    entity_type: Option<String>,
    scope: Option<String>,
}

pub async fn query(
    State(state): State<AppState>,
    query_params: Result<Query<AttributeQueryParams>, QueryRejection>,
) -> ApiResult<Json<Envelope<Vec<AttributeRecord>>>> {
    let Query(query_params) = query_params?;
    let filter = AttributeFilter {
        entity_id: params::present(query_params.entity_id),
        entity_type: params::present(query_params.entity_type)
            .map(|t| t.parse::<EntityType>())
            .transpose()?,
        scope: params::present(query_params.scope)
            .map(|s| s.parse::<AttributeScope>())
            .transpose()?,
    };

    Ok(Json(Envelope::list(state.attributes.query(&filter))))
}

pub async fn save(
    State(state): State<AppState>,
    path: Result<Path<(String, String, String)>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let Path((entity_type, entity_id, scope)) = path?;
    let entity = params::entity_ref(&entity_type, entity_id)?;
    let scope = params::scope(&scope)?;
    let Json(body) = body?;
    let values = into_object(body)?;

    let written = state.attributes.save(&entity, scope, values);
    info!(entity = %entity, scope = %scope, written, "Attributes saved");

    Ok(Json(Envelope::message("Attributes saved successfully")))
}

pub async fn remove(
    State(state): State<AppState>,
    path: Result<Path<(String, String, String, String)>, PathRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let Path((entity_type, entity_id, scope, key)) = path?;
    let entity = params::entity_ref(&entity_type, entity_id)?;
    let scope = params::scope(&scope)?;

    if !state.attributes.remove(&entity, scope, &key) {
        return Err(ApiError::not_found("Attribute not found"));
    }

    info!(entity = %entity, scope = %scope, key = %key, "Attribute deleted");
    Ok(Json(Envelope::message("Attribute deleted successfully")))
}
