//! Path and query string parsing

use iotc_core::{AttributeScope, EntityRef, EntityType};

use crate::error::{ApiError, ApiResult};

/// Empty query values count as absent.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn entity_ref(entity_type: &str, entity_id: String) -> ApiResult<EntityRef> {
    if entity_id.is_empty() {
        return Err(ApiError::bad_request("Entity id is required"));
    }
    Ok(EntityRef::new(entity_type.parse::<EntityType>()?, entity_id))
}

pub fn scope(scope: &str) -> ApiResult<AttributeScope> {
    Ok(scope.parse::<AttributeScope>()?)
}

/// Comma-separated key list. An empty value disables the key filter.
pub fn keys(value: Option<String>) -> Option<Vec<String>> {
    present(value).map(|keys| keys.split(',').map(str::to_string).collect())
}

pub fn timestamp(name: &str, value: Option<String>) -> ApiResult<Option<i64>> {
    present(value)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| ApiError::bad_request(format!("{} must be an integer timestamp, got '{}'", name, v)))
        })
        .transpose()
}

pub fn limit(value: Option<String>) -> ApiResult<Option<usize>> {
    present(value)
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| ApiError::bad_request(format!("limit must be a non-negative integer, got '{}'", v)))
        })
        .transpose()
}
