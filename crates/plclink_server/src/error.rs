//! API error types and conversions

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use plclink_core::{ReportValidationError, ServiceError};
use serde::Serialize;

/// Message for a report body lacking `gatewayID` or `state`.
pub const MISSING_REPORT_FIELDS_MESSAGE: &str = "gatewayID e state são obrigatórios";
/// Message for an unknown report id.
pub const NOT_FOUND_MESSAGE: &str = "Registro não encontrado";

/// Which status a storage fault maps to for a given operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultDomain {
    /// Create, update and delete: storage faults surface as 400.
    Client,
    /// List and get: storage faults surface as 500.
    Server,
}

/// API error type that converts to HTTP responses
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 404 Not Found
    NotFound(String),
    /// 500 Internal Server Error
    Internal(String),
}

/// Standard error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// Translate a service outcome for an operation in `domain`.
    pub fn from_service(err: ServiceError, domain: FaultDomain) -> Self {
        match err {
            ServiceError::MissingRequiredField(_)
            | ServiceError::Validation(ReportValidationError::MissingRequiredField(_)) => {
                ApiError::BadRequest(MISSING_REPORT_FIELDS_MESSAGE.to_string())
            }
            ServiceError::Validation(err) => ApiError::BadRequest(err.to_string()),
            ServiceError::NotFound(_) => ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            ServiceError::Storage(err) => match domain {
                FaultDomain::Client => ApiError::BadRequest(err.to_string()),
                FaultDomain::Server => ApiError::Internal(err.to_string()),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Internal(msg) => msg,
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            log::error!(
                "event=http_error module=server status={} error={}",
                status.as_u16(),
                message
            );
        } else {
            log::debug!(
                "event=http_error module=server status={} error={}",
                status.as_u16(),
                message
            );
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
