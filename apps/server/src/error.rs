use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smartlearn_core::SmartlearnError;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<SmartlearnError> for ApiError {
    fn from(err: SmartlearnError) -> Self {
        let status = match err {
            SmartlearnError::EmptyField { .. }
            | SmartlearnError::InvalidVideoUrl { .. }
            | SmartlearnError::UnknownSession { .. }
            | SmartlearnError::SessionCompleted { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.message, "request failed");
        } else {
            tracing::debug!(error = %self.message, "request rejected");
        }
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
