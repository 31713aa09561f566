//! Mapping of log errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::Error;

/// Error returned by handlers; always rendered as a 500-class response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self.0 {
            Error::Open { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "unavailable"),
            Error::Read(_) | Error::Truncated { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "read_error")
            }
            Error::Write { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        tracing::warn!(error = %self.0, "request failed");

        let body = serde_json::json!({
            "status": "error",
            "errorType": error_type,
            "error": self.0.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}
