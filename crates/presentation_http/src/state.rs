//! Application state shared across handlers

use std::sync::Arc;

use application::{CachePort, StopResolver, TransportService};
use infrastructure::Services;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Departure dispatcher
    pub transport: Arc<TransportService>,
    /// Stop-name autocomplete
    pub resolver: Arc<StopResolver>,
    /// Result cache, read for health statistics
    pub cache: Arc<dyn CachePort>,
}

impl From<Services> for AppState {
    fn from(services: Services) -> Self {
        Self {
            transport: services.transport,
            resolver: services.resolver,
            cache: services.cache,
        }
    }
}
