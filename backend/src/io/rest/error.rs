//! Translation of domain failures into HTTP error responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Local;
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::validation::ValidationFailure;
use crate::domain::BirthdayServiceError;

const STORAGE_FAILURE_MESSAGE: &str = "Database operation failed. Please try again later.";
const UNEXPECTED_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// An error on its way out of a handler, tagged with the request path
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
    validation_errors: Option<Vec<String>>,
    path: String,
}

impl ApiError {
    /// Client sent something we could not even parse
    pub fn bad_request(message: impl Into<String>, path: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Bad Request",
            message: message.into(),
            validation_errors: None,
            path: path.to_string(),
        }
    }

    pub fn validation(failure: ValidationFailure, path: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Validation Error",
            message: failure.summary().to_string(),
            validation_errors: Some(failure.violations().iter().map(|v| v.to_string()).collect()),
            path: path.to_string(),
        }
    }

    pub fn from_service(err: BirthdayServiceError, path: &str) -> Self {
        match err {
            BirthdayServiceError::Validation(failure) => Self::validation(failure, path),
            BirthdayServiceError::NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                error: "Not Found",
                message: err.to_string(),
                validation_errors: None,
                path: path.to_string(),
            },
            BirthdayServiceError::Storage(cause) => {
                error!("Storage failure on {}: {}", path, cause);
                Self {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    error: "Service Unavailable",
                    message: STORAGE_FAILURE_MESSAGE.to_string(),
                    validation_errors: None,
                    path: path.to_string(),
                }
            }
            BirthdayServiceError::Unexpected(cause) => {
                error!("Unexpected failure on {}: {}", path, cause);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: "Internal Server Error",
                    message: UNEXPECTED_FAILURE_MESSAGE.to_string(),
                    validation_errors: None,
                    path: path.to_string(),
                }
            }
        }
    }

    pub fn from_json_rejection(rejection: JsonRejection, path: &str) -> Self {
        warn!("Rejected request body on {}: {}", path, rejection.body_text());
        Self::bad_request("Invalid JSON format or malformed request body", path)
    }

    pub fn from_query_rejection(rejection: QueryRejection, path: &str) -> Self {
        warn!("Rejected query string on {}: {}", path, rejection.body_text());
        Self::bad_request(rejection.body_text(), path)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.message,
            status: self.status.as_u16(),
            error: self.error.to_string(),
            path: self.path,
            validation_errors: self.validation_errors,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}
