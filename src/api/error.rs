//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::calendar::CalendarError;
use crate::session::SessionError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Calendar export error
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Session / role error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Calendar(CalendarError::MissingField(_)) => {
                (StatusCode::BAD_REQUEST, "MISSING_FIELD")
            }
            ApiError::Calendar(CalendarError::OutOfRange { .. }) => {
                (StatusCode::BAD_REQUEST, "DATE_OUT_OF_RANGE")
            }
            ApiError::Calendar(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CALENDAR_ERROR"),
            ApiError::Session(SessionError::RoleNotAvailable(_))
            | ApiError::Session(SessionError::UnknownRole(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ROLE")
            }
            ApiError::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SESSION_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(CalendarError::MissingField("title"));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "MISSING_FIELD"));

        let err = ApiError::from(SessionError::RoleNotAvailable(Role::Admin));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "INVALID_ROLE"));

        let err = ApiError::Internal("boom".to_string());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
