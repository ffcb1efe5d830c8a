//! Service construction from configuration
//!
//! Both binaries build the same object graph: one cache, one rail adapter
//! and one retrieval adapter shared by the dispatcher and the resolver.

use std::sync::Arc;

use ai_core::GeminiInferenceEngine;
use application::{
    ApplicationError, CachePort, GroundedRetrievalPort, RailDataPort, StopResolver,
    TransportService,
};
use integration_irail::IRailClient;
use tracing::{info, warn};

use crate::{
    adapters::{GeminiRetrievalAdapter, IRailAdapter},
    cache::{MokaCache, NoopCache},
    config::AppConfig,
};

/// Services exposed to the presentation layer
#[derive(Debug, Clone)]
pub struct Services {
    pub transport: Arc<TransportService>,
    pub resolver: Arc<StopResolver>,
    pub cache: Arc<dyn CachePort>,
}

/// Build the services described by `config`
///
/// # Errors
///
/// Returns a configuration error if the configuration is invalid or an
/// upstream client cannot be created.
pub fn build_services(config: &AppConfig) -> Result<Services, ApplicationError> {
    config.validate().map_err(ApplicationError::Configuration)?;

    let cache: Arc<dyn CachePort> = if config.cache.enabled {
        Arc::new(MokaCache::with_max_entries(config.cache.max_entries))
    } else {
        warn!("Result cache disabled");
        Arc::new(NoopCache)
    };

    let client = IRailClient::new(&config.irail)
        .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
    let rail: Arc<dyn RailDataPort> =
        Arc::new(IRailAdapter::new(Arc::new(client)).with_retry(config.retry.clone()));

    if !config.has_retrieval_key() {
        warn!("No retrieval API key configured; STIB and De Lijn searches will fail");
    }
    let engine = GeminiInferenceEngine::new(config.retrieval.clone())
        .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
    let retrieval: Arc<dyn GroundedRetrievalPort> =
        Arc::new(GeminiRetrievalAdapter::new(Arc::new(engine)).with_retry(config.retry.clone()));

    let freshness = config.cache.freshness();
    let transport = TransportService::new(
        Arc::clone(&rail),
        Arc::clone(&retrieval),
        Arc::clone(&cache),
    )
    .with_freshness(freshness);
    let resolver =
        StopResolver::new(rail, retrieval, Arc::clone(&cache)).with_freshness(freshness);

    info!(
        freshness_secs = freshness.as_secs(),
        cache_enabled = config.cache.enabled,
        model = %config.retrieval.default_model,
        "Services ready"
    );

    Ok(Services {
        transport: Arc::new(transport),
        resolver: Arc::new(resolver),
        cache,
    })
}
