//! API error type with structured JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinic_core::{ClinicError, ErrorKind};
use serde::Serialize;
use utoipa::ToSchema;

/// Error response body returned by the JSON API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Clinic(#[from] ClinicError),
    #[error("invalid request body: {}", .0.body_text())]
    BadRequest(#[from] JsonRejection),
    #[error("blocking task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// Whether a form handler can redisplay its input with this error's message.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ApiError::Clinic(e) => e.is_recoverable(),
            ApiError::BadRequest(_) => true,
            ApiError::TaskJoin(_) => false,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Clinic(
                ClinicError::UnknownReference { .. } | ClinicError::ForeignKeyViolation,
            ) => (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_REFERENCE"),
            ApiError::Clinic(e) => match e.kind() {
                ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ErrorKind::Storage => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            ApiError::TaskJoin(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("API internal error: {:?}", self);
            "An internal error occurred".to_string()
        } else {
            tracing::warn!("API request rejected: {}", self);
            self.to_string()
        };

        (
            status,
            Json(ErrorBody {
                error: ErrorDetail {
                    code: code.to_string(),
                    message,
                },
            }),
        )
            .into_response()
    }
}
