use axum::Json;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warbler_auth::IssueError;
use warbler_core::DomainError;
use warbler_infra::{PostError, StoreError};

/// Failures surfaced to HTTP clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Protected route reached with an empty identity slot.
    #[error("Error: Unauthorized")]
    Unauthenticated,

    /// Ownership mismatch; shares the unauthenticated status class.
    #[error("{0}")]
    Unauthorized(String),

    #[error("Invalid username/email or password.")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Detail is logged, never sent to the client.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::Unauthorized(_) | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        let message = err.to_string();
        match err {
            PostError::NotFound(_) => ApiError::NotFound(message),
            PostError::Forbidden { .. } => ApiError::Unauthorized(message),
            PostError::Validation(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::BadRequest(msg),
            StoreError::Unavailable(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<IssueError> for ApiError {
    fn from(err: IssueError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Error body: `{timestamp, message, details}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub details: String,
}

impl ErrorDetails {
    pub fn new(message: impl Into<String>, uri: &Uri) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            details: format!("uri={}", uri.path()),
        }
    }
}

/// The single boundary adapter from handler results to responses.
pub fn respond<T: IntoResponse>(uri: &Uri, result: Result<T, ApiError>) -> Response {
    match result {
        Ok(value) => value.into_response(),
        Err(err) => error_response(uri, err),
    }
}

pub fn error_response(uri: &Uri, err: ApiError) -> Response {
    let status = err.status();
    match &err {
        ApiError::Internal(detail) => {
            tracing::error!(path = %uri.path(), error = %detail, "request failed");
        }
        ApiError::Unauthenticated => {
            tracing::debug!(path = %uri.path(), "unauthenticated request to protected route");
        }
        _ => {}
    }
    json_error(status, ErrorDetails::new(err.to_string(), uri))
}

pub fn json_error(status: StatusCode, body: ErrorDetails) -> Response {
    (status, Json(body)).into_response()
}
