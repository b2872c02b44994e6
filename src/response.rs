use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// Handlers return the bare resource on success and an [`AppError`] otherwise.
pub type ApiResult<T> = Result<T, AppError>;

/// Envelope used for every error body the server produces.
#[derive(Debug, Serialize)]
pub struct JsonErrorResponse {
    pub status: u16,
    pub message: String,
    pub data: serde_json::Value,
}

impl JsonErrorResponse {
    pub(crate) fn from_error(err: &AppError) -> Self {
        let status = status_for(err);
        let data = err
            .field_errors()
            .and_then(|errors| serde_json::to_value(errors).ok())
            .unwrap_or(serde_json::Value::Null);
        Self {
            status: status.as_u16(),
            message: err.message().to_string(),
            data,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            log_app_error(&self, status);
        }
        JsonErrorResponse::from_error(&self).into_response()
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    tracing::error!(status = status.as_u16(), error = %err, "request failed");
}
