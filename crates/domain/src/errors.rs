//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Leg sequence does not form a continuous trip
    #[error("Invalid itinerary: {0}")]
    InvalidItinerary(String),

    /// Clock time could not be parsed
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// Network identifier is not recognised
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an invalid itinerary error
    pub fn invalid_itinerary(reason: impl Into<String>) -> Self {
        Self::InvalidItinerary(reason.into())
    }
}
