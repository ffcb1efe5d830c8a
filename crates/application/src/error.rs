//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Upstream asked us to slow down, after retries were exhausted
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Upstream unreachable or failing
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Upstream answered with data we cannot interpret
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// Upstream does not know the requested stop
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error signals upstream rate limiting
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// Check if this error is retryable
    ///
    /// Only rate limiting is retried; every other failure surfaces at once.
    pub const fn is_retryable(&self) -> bool {
        self.is_rate_limited()
    }

    /// Check if upstream answered with unusable data
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}
