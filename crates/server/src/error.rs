//! JSON error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use harvest_core::HarvestError;
use serde::Serialize;

/// An error as returned to HTTP clients:
/// `{"error": {"kind": ..., "message": ..., "field": ...}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
    pub field: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    kind: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

impl From<HarvestError> for ApiError {
    fn from(err: HarvestError) -> Self {
        let status = match &err {
            HarvestError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            e if e.is_fetch_error() => StatusCode::BAD_GATEWAY,
            e if e.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            HarvestError::IndexOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self { status, kind: err.kind(), message: err.to_string(), field: err.field().map(str::to_string) }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self { status: rejection.status(), kind: "invalid_request", message: rejection.body_text(), field: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail { kind: self.kind, message: &self.message, field: self.field.as_deref() },
        };
        (self.status, Json(body)).into_response()
    }
}
