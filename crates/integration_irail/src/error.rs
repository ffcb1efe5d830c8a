//! iRail error types

use thiserror::Error;

/// Errors that can occur while talking to the iRail API
#[derive(Debug, Error)]
pub enum IRailError {
    /// Connection to the API failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request returned an unexpected status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The requested station is unknown to the API
    #[error("Station not found: {0}")]
    StationNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl IRailError {
    /// Returns true if the API asked us to slow down
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. })
    }

    /// Returns true if the upstream answered but the payload was unusable
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }
}
