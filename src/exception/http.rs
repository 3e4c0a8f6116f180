use crate::error::ControllerError;
use crate::exception::ExceptionFilter;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON body of an error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub timestamp: String,
}

/// The default exception filter.
///
/// Unknown controllers become `404 Not Found`; every other failure becomes
/// `500 Internal Server Error`.
#[derive(Debug, Default)]
pub struct HttpExceptionFilter;

impl ExceptionFilter for HttpExceptionFilter {
    fn catch(&self, error: ControllerError) -> Response {
        let status = error.status_code();
        if status.is_server_error() {
            tracing::error!(error = %error, "Controller dispatch failed");
        } else {
            tracing::debug!(error = %error, "Controller dispatch rejected");
        }

        let body = ErrorBody {
            status_code: status.as_u16(),
            message: error.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        (status, Json(body)).into_response()
    }
}
