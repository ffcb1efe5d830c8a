//! Rail data adapter - Implements RailDataPort using integration_irail

use std::sync::Arc;

use application::{error::ApplicationError, ports::RailDataPort};
use async_trait::async_trait;
use domain::{SearchOptions, SearchResult};
use integration_irail::{IRailError, ItineraryNormalizer, RailClient};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Map an iRail failure onto the application taxonomy
pub(crate) fn map_irail_error(err: IRailError) -> ApplicationError {
    match err {
        IRailError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
        IRailError::ParseError(msg) => ApplicationError::MalformedResponse(msg),
        IRailError::StationNotFound(station) => ApplicationError::NotFound(station),
        IRailError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
        other => ApplicationError::ExternalService(format!("iRail: {other}")),
    }
}

/// Adapter for the national rail network backed by iRail
pub struct IRailAdapter {
    client: Arc<dyn RailClient>,
    normalizer: ItineraryNormalizer,
    retry: RetryConfig,
}

impl std::fmt::Debug for IRailAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IRailAdapter")
            .field("normalizer", &self.normalizer)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl IRailAdapter {
    pub fn new(client: Arc<dyn RailClient>) -> Self {
        Self {
            client,
            normalizer: ItineraryNormalizer::default(),
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn with_normalizer(mut self, normalizer: ItineraryNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }
}

#[async_trait]
impl RailDataPort for IRailAdapter {
    #[instrument(skip(self, options))]
    async fn departures(
        &self,
        stop: &str,
        destination: Option<String>,
        options: &SearchOptions,
    ) -> Result<SearchResult, ApplicationError> {
        let response = retry(&self.retry, || {
            self.client.journeys(stop, destination.as_deref(), options)
        })
        .await
        .map_err(map_irail_error)?;

        let result = self
            .normalizer
            .normalize(&response)
            .map_err(map_irail_error)?;
        debug!(count = result.departures.len(), "Rail departures normalized");
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn station_names(&self) -> Result<Vec<String>, ApplicationError> {
        let stations = retry(&self.retry, || self.client.stations())
            .await
            .map_err(map_irail_error)?;
        Ok(stations.into_iter().map(|s| s.name).collect())
    }
}
