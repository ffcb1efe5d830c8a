//! API error handling
//!
//! Maps application failures onto HTTP status codes. Clients can tell a
//! rate-limited upstream (429) from an unreachable one (503) and from one
//! that answered with unusable data (502). An empty departure list is a
//! regular 200 response, never an error.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether upstream error details are echoed to clients
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether upstream and internal error details appear in responses
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Stable machine-readable code
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for this error
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::RateLimited => "rate_limited",
            Self::BadGateway(_) => "malformed_upstream",
            Self::ServiceUnavailable(_) => "upstream_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, details) = match &self {
            Self::BadRequest(msg) | Self::NotFound(msg) => (msg.clone(), None),
            Self::RateLimited => (
                "Upstream rate limit exceeded, try again shortly".to_string(),
                None,
            ),
            Self::BadGateway(msg) => (
                "Upstream returned data that could not be read".to_string(),
                should_expose_details().then(|| msg.clone()),
            ),
            Self::ServiceUnavailable(msg) => (
                "Upstream service temporarily unavailable".to_string(),
                should_expose_details().then(|| msg.clone()),
            ),
            Self::Internal(msg) => (
                "An internal error occurred".to_string(),
                should_expose_details().then(|| msg.clone()),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: self.code().to_string(),
            details,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::RateLimited => Self::RateLimited,
            ApplicationError::ExternalService(msg) => Self::ServiceUnavailable(msg),
            ApplicationError::MalformedResponse(msg) => Self::BadGateway(msg),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::InvalidInput(msg) => Self::BadRequest(msg),
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}
