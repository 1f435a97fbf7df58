//! HTTP error type and error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::date::DateParseError;
use crate::ledger::LedgerError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Stable error code identifier.
    pub error_code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body or date could not be understood.
    #[error("{message}")]
    BadRequest { message: String },
    /// The ledger refused a transaction (payer would go negative).
    #[error("{message}")]
    RejectedTransaction { message: String },
    /// A spend asked for more than the ledger holds.
    #[error("{message}")]
    InsufficientPoints { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    MethodNotAllowed { message: String },
    #[error("{message}")]
    ServiceUnavailable { message: String },
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::RejectedTransaction { .. } => (StatusCode::BAD_REQUEST, "REJECTED_TRANSACTION"),
            Self::InsufficientPoints { .. } => (StatusCode::BAD_REQUEST, "INSUFFICIENT_POINTS"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::MethodNotAllowed { .. } => (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED"),
            Self::ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorResponse {
            error: ErrorDetail {
                error_code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::RejectedTransaction { .. } => Self::RejectedTransaction { message },
            LedgerError::InsufficientPoints { .. } => Self::InsufficientPoints { message },
        }
    }
}

impl From<DateParseError> for ApiError {
    fn from(err: DateParseError) -> Self {
        Self::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest {
            message: format!("invalid request body: {err}"),
        }
    }
}
