//! Stop name autocomplete
//!
//! Resolution is best-effort: upstream failures degrade to the local
//! gazetteer instead of surfacing an error.

use std::{sync::Arc, time::Duration};

use domain::Network;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

use super::{
    cache_keys::stop_search_key,
    gazetteer::{StopGazetteer, filter_names},
    in_flight::InFlightGate,
};
use crate::{
    error::ApplicationError,
    ports::{
        CachePort, CachePortExt, GroundedRetrievalPort, RailDataPort, RetrievalQuery, freshness,
    },
};

/// Shorter inputs resolve to nothing
pub const MIN_QUERY_CHARS: usize = 2;

/// Local matches at or above this count skip the upstream lookup
pub const LOCAL_SUFFICIENT: usize = 5;

/// Upper bound on returned suggestions
pub const MAX_SUGGESTIONS: usize = 8;

/// Resolves partial stop names into official ones
pub struct StopResolver {
    gazetteer: StopGazetteer,
    rail: Arc<dyn RailDataPort>,
    retrieval: Arc<dyn GroundedRetrievalPort>,
    cache: Arc<dyn CachePort>,
    freshness: Duration,
    directory: OnceCell<Vec<String>>,
    in_flight: InFlightGate,
}

impl std::fmt::Debug for StopResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopResolver")
            .field("freshness", &self.freshness)
            .field("directory_loaded", &self.directory.initialized())
            .finish_non_exhaustive()
    }
}

impl StopResolver {
    pub fn new(
        rail: Arc<dyn RailDataPort>,
        retrieval: Arc<dyn GroundedRetrievalPort>,
        cache: Arc<dyn CachePort>,
    ) -> Self {
        Self {
            gazetteer: StopGazetteer::default(),
            rail,
            retrieval,
            cache,
            freshness: freshness::DEFAULT,
            directory: OnceCell::new(),
            in_flight: InFlightGate::new(),
        }
    }

    #[must_use]
    pub fn with_gazetteer(mut self, gazetteer: StopGazetteer) -> Self {
        self.gazetteer = gazetteer;
        self
    }

    /// Set how long retrieved suggestions stay cached, clamped to the accepted range
    #[must_use]
    pub fn with_freshness(mut self, window: Duration) -> Self {
        self.freshness = freshness::clamp(window);
        self
    }

    /// Candidate official stop names for `partial`, in source order
    #[instrument(skip(self), fields(network = %network))]
    pub async fn resolve(&self, partial: &str, network: Network) -> Vec<String> {
        let query = partial.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let mut local = self.gazetteer.matches(network, query);
        if local.len() >= LOCAL_SUFFICIENT {
            local.truncate(MAX_SUGGESTIONS);
            return local;
        }

        let upstream = if network.has_structured_api() {
            self.search_directory(query).await
        } else {
            self.search_retrieval(query, network).await
        };

        match upstream {
            Ok(mut names) => {
                names.truncate(MAX_SUGGESTIONS);
                names
            },
            Err(e) => {
                warn!(error = %e, "Stop lookup failed, using local suggestions");
                local.truncate(MAX_SUGGESTIONS);
                local
            },
        }
    }

    /// Filter the rail station directory, loading it on first use
    async fn search_directory(&self, query: &str) -> Result<Vec<String>, ApplicationError> {
        let directory = self
            .directory
            .get_or_try_init(|| async {
                let names = self.rail.station_names().await?;
                debug!(stations = names.len(), "Station directory loaded");
                Ok::<_, ApplicationError>(names)
            })
            .await?;
        Ok(filter_names(directory.iter().map(String::as_str), query))
    }

    async fn search_retrieval(
        &self,
        query: &str,
        network: Network,
    ) -> Result<Vec<String>, ApplicationError> {
        let key = stop_search_key(query, network);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let _gate = self.in_flight.acquire(&key).await;
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let answer = self.retrieval.retrieve(Self::query(query, network)).await?;
        let names: Vec<String> = serde_json::from_str::<Vec<String>>(answer.text.trim())
            .map_err(|e| ApplicationError::MalformedResponse(format!("stop list JSON: {e}")))?
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        if let Err(e) = self.cache.set(&key, &names, self.freshness).await {
            warn!(error = %e, "Failed to cache stop suggestions");
        }
        Ok(names)
    }

    async fn cached(&self, key: &str) -> Option<Vec<String>> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cache entry");
                None
            },
        }
    }

    fn query(query: &str, network: Network) -> RetrievalQuery {
        RetrievalQuery {
            system_instruction: None,
            prompt: format!(
                "Trouve les noms officiels des arrêts du réseau {} en Belgique correspondant à \
                 \"{query}\". Utilise les données officielles de {}. \
                 Retourne uniquement un tableau JSON de strings.",
                network.display_name(),
                network.official_domain(),
            ),
            grounded: false,
            schema: json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
        }
    }
}
