//! Error responses for the Console API

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use iotc_core::IotcError;
use serde_json::json;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Message returned for every internal failure
pub const INTERNAL_MESSAGE: &str = "Something went wrong!";

/// Detail of an internal failure, attached to the response so the
/// development-mode middleware can surface it.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

#[derive(Debug)]
pub struct ApiError(pub IotcError);

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(IotcError::not_found(message))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(IotcError::validation(message))
    }
}

impl From<IotcError> for ApiError {
    fn from(err: IotcError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(format!("Invalid path: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = self.0.error_code(), "Internal error: {}", self.0);
            let mut response = (
                status,
                Json(json!({
                    "success": false,
                    "message": INTERNAL_MESSAGE,
                    "error": "Internal server error"
                })),
            )
                .into_response();
            response
                .extensions_mut()
                .insert(ErrorDetail(self.0.to_string()));
            return response;
        }

        tracing::debug!(code = self.0.error_code(), status = status.as_u16(), "{}", self.0);
        (
            status,
            Json(json!({
                "success": false,
                "message": self.0.to_string()
            })),
        )
            .into_response()
    }
}
