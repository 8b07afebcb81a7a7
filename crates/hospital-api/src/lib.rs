//! API error types for the hospital management service.
//!
//! Every failed request answers with a JSON body of the form
//! `{"status": "Not Found", "message": "Bed not found", "error": "..."}`:
//! `status` is the canonical reason phrase, `message` is written for
//! people and `error` carries the underlying cause.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hospital_storage::{ErrorCategory, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
    pub error: String,
}

/// High-level API errors to be mapped to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {message}: {detail}")]
    BadRequest { message: String, detail: String },
    #[error("Not found: {message}: {detail}")]
    NotFound { message: String, detail: String },
    #[error("Conflict: {message}: {detail}")]
    Conflict { message: String, detail: String },
    #[error("Bad gateway: {message}: {detail}")]
    BadGateway { message: String, detail: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            detail: detail.into(),
        }
    }
    pub fn not_found(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            detail: detail.into(),
        }
    }
    pub fn conflict(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            detail: detail.into(),
        }
    }
    pub fn bad_gateway(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::BadGateway {
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// Maps a store failure on a `resource`, using `failure` as the message
    /// when the store itself could not be reached.
    ///
    /// ```ignore
    /// ApiError::from_store(err, "Bed", "Failed to delete bed from database")
    /// // NotFound  -> 404 "Bed not found"
    /// // Conflict  -> 409 "Bed already exists"
    /// // Transport -> 502 "Failed to delete bed from database"
    /// ```
    pub fn from_store(err: StoreError, resource: &str, failure: &str) -> Self {
        let detail = err.to_string();
        match err.category() {
            ErrorCategory::NotFound => Self::not_found(format!("{resource} not found"), detail),
            ErrorCategory::Conflict => {
                Self::conflict(format!("{resource} already exists"), detail)
            }
            ErrorCategory::Transport => Self::bad_gateway(failure, detail),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::Conflict { message, .. }
            | ApiError::BadGateway { message, .. } => message,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest { detail, .. }
            | ApiError::NotFound { detail, .. }
            | ApiError::Conflict { detail, .. }
            | ApiError::BadGateway { detail, .. } => detail,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let status = self.status_code();
        ErrorBody {
            status: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.message().to_string(),
            error: self.detail().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

/// Attaches resource context to store results in handlers.
pub trait StoreResultExt<T> {
    /// See [`ApiError::from_store`].
    fn or_api(self, resource: &str, failure: &str) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn or_api(self, resource: &str, failure: &str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::from_store(err, resource, failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use std::time::Duration;

    #[test]
    fn into_response_sets_status_and_content_type() {
        let resp = ApiError::bad_request("Invalid request body", "expected `,`").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
        assert_eq!(content_type, "application/json");
    }

    #[test]
    fn body_shape() {
        let body = ApiError::not_found("Bed not found", "document not found: beds/b1").to_body();
        assert_eq!(body.status, "Not Found");
        assert_eq!(body.message, "Bed not found");
        assert_eq!(body.error, "document not found: beds/b1");
    }

    #[test]
    fn store_errors_map_to_status_and_message() {
        let cases: Vec<(StoreError, StatusCode, &str)> = vec![
            (
                StoreError::not_found("beds", "b1"),
                StatusCode::NOT_FOUND,
                "Bed not found",
            ),
            (
                StoreError::conflict("beds", "b1"),
                StatusCode::CONFLICT,
                "Bed already exists",
            ),
            (
                StoreError::timeout(Duration::from_secs(10)),
                StatusCode::BAD_GATEWAY,
                "Failed to update bed in database",
            ),
            (
                StoreError::connection("refused"),
                StatusCode::BAD_GATEWAY,
                "Failed to update bed in database",
            ),
        ];
        let failure = "Failed to update bed in database";
        for (err, status, message) in cases.into_iter() {
            let api = ApiError::from_store(err, "Bed", failure);
            assert_eq!(api.status_code(), status);
            assert_eq!(api.message(), message);
        }
    }

    #[test]
    fn result_extension_keeps_ok_values() {
        let failure = "Failed to find patient in database";
        let ok: Result<u8, StoreError> = Ok(3);
        assert_eq!(ok.or_api("Patient", failure).unwrap(), 3);

        let err: Result<u8, StoreError> = Err(StoreError::cancelled());
        let api = err.or_api("Patient", failure).unwrap_err();
        assert_eq!(api.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(api.message(), "Failed to find patient in database");
        assert_eq!(api.detail(), "operation cancelled");
    }
}
