//! JSON error bodies and the mapping from application errors to HTTP.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ConsultantError;
use crate::domain::foundation::ValidationError;

/// Error body returned by every JSON endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Consultant(ConsultantError),
    BadRequest(String),
}

impl From<ConsultantError> for ApiError {
    fn from(err: ConsultantError) -> Self {
        Self::Consultant(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message)
            }
            ApiError::Consultant(err) => {
                let (status, code) = match &err {
                    ConsultantError::NotFound(_) => {
                        (StatusCode::NOT_FOUND, "CONVERSATION_NOT_FOUND")
                    }
                    ConsultantError::InvalidState(_) => {
                        (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
                    }
                    ConsultantError::Conflict => (StatusCode::CONFLICT, "CONCURRENT_MODIFICATION"),
                    ConsultantError::Repository(_) => {
                        tracing::error!("Repository failure: {}", err);
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                (status, code, err.to_string())
            }
        };

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}
