//! CRUD endpoints shared by the profile, asset and device catalogs

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use iotc_store::{
    validated, value::into_object, Asset, AssetFilter, AssetProfile, AssetProfileFilter, Catalog,
    CatalogEntry, CreateAsset, CreateAssetProfile, CreateDevice, CreateDeviceProfile, Device,
    DeviceFilter, DeviceProfile, DeviceProfileFilter,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;
use validator::Validate;

use super::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// A catalog entry type exposed over REST
pub trait CatalogResource: CatalogEntry {
    type Create: DeserializeOwned + Validate + Send;
    type Filter: DeserializeOwned + Send + Sync + 'static;

    fn catalog(state: &AppState) -> &Catalog<Self>;

    fn build(request: Self::Create) -> Self;

    fn matches(filter: &Self::Filter, entry: &Self) -> bool;
}

impl CatalogResource for AssetProfile {
    type Create = CreateAssetProfile;
    type Filter = AssetProfileFilter;

    fn catalog(state: &AppState) -> &Catalog<Self> {
        &state.asset_profiles
    }

    fn build(request: Self::Create) -> Self {
        AssetProfile::new(request)
    }

    fn matches(filter: &Self::Filter, entry: &Self) -> bool {
        filter.matches(entry)
    }
}

impl CatalogResource for DeviceProfile {
    type Create = CreateDeviceProfile;
    type Filter = DeviceProfileFilter;

    fn catalog(state: &AppState) -> &Catalog<Self> {
        &state.device_profiles
    }

    fn build(request: Self::Create) -> Self {
        DeviceProfile::new(request)
    }

    fn matches(filter: &Self::Filter, entry: &Self) -> bool {
        filter.matches(entry)
    }
}

impl CatalogResource for Asset {
    type Create = CreateAsset;
    type Filter = AssetFilter;

    fn catalog(state: &AppState) -> &Catalog<Self> {
        &state.assets
    }

    fn build(request: Self::Create) -> Self {
        Asset::new(request)
    }

    fn matches(filter: &Self::Filter, entry: &Self) -> bool {
        filter.matches(entry)
    }
}

impl CatalogResource for Device {
    type Create = CreateDevice;
    type Filter = DeviceFilter;

    fn catalog(state: &AppState) -> &Catalog<Self> {
        &state.devices
    }

    fn build(request: Self::Create) -> Self {
        Device::new(request)
    }

    fn matches(filter: &Self::Filter, entry: &Self) -> bool {
        filter.matches(entry)
    }
}

fn not_found<T: CatalogResource>() -> ApiError {
    ApiError::not_found(format!("{} not found", T::KIND))
}

pub async fn list<T: CatalogResource>(
    State(state): State<AppState>,
    filter: Result<Query<T::Filter>, QueryRejection>,
) -> ApiResult<Json<Envelope<Vec<T>>>> {
    let Query(filter) = filter?;
    let entries = T::catalog(&state).list(|entry| T::matches(&filter, entry));
    Ok(Json(Envelope::list(entries)))
}

pub async fn get_one<T: CatalogResource>(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Envelope<T>>> {
    let Path(id) = id?;
    T::catalog(&state)
        .get(&id)
        .map(|entry| Json(Envelope::data(entry)))
        .ok_or_else(not_found::<T>)
}

pub async fn create<T: CatalogResource>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<T>>)> {
    let Json(body) = body?;
    let request: T::Create = serde_json::from_value(Value::Object(into_object(body)?))
        .map_err(|e| ApiError::bad_request(format!("Invalid {}: {}", T::KIND, e)))?;

    let entry = T::catalog(&state).insert(T::build(validated(request)?));
    info!(kind = T::KIND, id = entry.id(), "Created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(entry).with_message(format!("{} created successfully", T::KIND))),
    ))
}

pub async fn update<T: CatalogResource>(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Envelope<T>>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let patch = into_object(body)?;

    let entry = T::catalog(&state)
        .update(&id, patch)?
        .ok_or_else(not_found::<T>)?;
    info!(kind = T::KIND, id = %id, "Updated");

    Ok(Json(
        Envelope::data(entry).with_message(format!("{} updated successfully", T::KIND)),
    ))
}

pub async fn remove<T: CatalogResource>(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let Path(id) = id?;
    if !T::catalog(&state).remove(&id) {
        return Err(not_found::<T>());
    }
    info!(kind = T::KIND, id = %id, "Deleted");

    Ok(Json(Envelope::message(format!("{} deleted successfully", T::KIND))))
}
