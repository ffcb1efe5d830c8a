//! Departure search dispatcher
//!
//! Single entry point for departure searches: serves fresh cached answers,
//! coalesces identical concurrent requests and routes misses to the rail
//! API or the smart-network service.

use std::{sync::Arc, time::Duration};

use domain::{Network, SearchOptions, SearchResult};
use tracing::{debug, error, info, instrument, warn};

use super::{
    cache_keys::departures_key, in_flight::InFlightGate, smart_network_service::SmartNetworkService,
};
use crate::{
    error::ApplicationError,
    ports::{CachePort, CachePortExt, GroundedRetrievalPort, RailDataPort, freshness},
};

/// Departure search service
pub struct TransportService {
    rail: Arc<dyn RailDataPort>,
    smart: SmartNetworkService,
    cache: Arc<dyn CachePort>,
    freshness: Duration,
    in_flight: InFlightGate,
}

impl std::fmt::Debug for TransportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportService")
            .field("freshness", &self.freshness)
            .field("in_flight", &self.in_flight.active())
            .finish_non_exhaustive()
    }
}

impl TransportService {
    pub fn new(
        rail: Arc<dyn RailDataPort>,
        retrieval: Arc<dyn GroundedRetrievalPort>,
        cache: Arc<dyn CachePort>,
    ) -> Self {
        Self {
            rail,
            smart: SmartNetworkService::new(retrieval),
            cache,
            freshness: freshness::DEFAULT,
            in_flight: InFlightGate::new(),
        }
    }

    /// Set how long answers stay cached, clamped to the accepted range
    #[must_use]
    pub fn with_freshness(mut self, window: Duration) -> Self {
        self.freshness = freshness::clamp(window);
        self
    }

    /// Current freshness window
    #[must_use]
    pub const fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Departures from `stop` on `network`, optionally towards `destination`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank stop, otherwise the upstream error
    /// unchanged. Nothing is cached on failure.
    #[instrument(skip(self, options), fields(network = %network))]
    pub async fn fetch_transport_data(
        &self,
        stop: &str,
        network: Network,
        destination: Option<&str>,
        options: &SearchOptions,
    ) -> Result<SearchResult, ApplicationError> {
        let stop = stop.trim();
        if stop.is_empty() {
            return Err(ApplicationError::InvalidInput("stop name is empty".into()));
        }
        let destination = destination.map(str::trim).filter(|d| !d.is_empty());

        let key = departures_key(stop, network, destination, options);
        if let Some(hit) = self.cached(&key).await {
            debug!("Departures served from cache");
            return Ok(hit);
        }

        let _gate = self.in_flight.acquire(&key).await;
        if let Some(hit) = self.cached(&key).await {
            debug!("Departures filled by a concurrent request");
            return Ok(hit);
        }

        let result = self
            .fetch_upstream(stop, network, destination, options)
            .await
            .inspect_err(|e| {
                error!(network = %network, stop, error = %e, "Departure search failed");
            })?;

        info!(count = result.departures.len(), "Departures fetched");
        if let Err(e) = self.cache.set(&key, &result, self.freshness).await {
            warn!(error = %e, "Failed to cache departures");
        }
        Ok(result)
    }

    async fn fetch_upstream(
        &self,
        stop: &str,
        network: Network,
        destination: Option<&str>,
        options: &SearchOptions,
    ) -> Result<SearchResult, ApplicationError> {
        if network.has_structured_api() {
            self.rail
                .departures(stop, destination.map(str::to_string), options)
                .await
        } else {
            self.smart.fetch(stop, network, destination, options).await
        }
    }

    async fn cached(&self, key: &str) -> Option<SearchResult> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cache entry");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use domain::{ClockTime, Departure};

    use super::*;
    use crate::ports::{
        MockGroundedRetrievalPort, MockRailDataPort, RetrievalAnswer, memory::MemoryCache,
    };

    fn options() -> SearchOptions {
        SearchOptions::new(
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        )
    }

    fn board(line: &str) -> SearchResult {
        SearchResult::new(vec![Departure::new(
            "dep-0",
            line,
            "Namur",
            ClockTime::from_hm(8, 5).unwrap(),
        )])
    }

    fn service(
        rail: MockRailDataPort,
        retrieval: MockGroundedRetrievalPort,
        cache: Arc<MemoryCache>,
    ) -> TransportService {
        TransportService::new(Arc::new(rail), Arc::new(retrieval), cache)
    }

    #[tokio::test]
    async fn rail_network_routes_to_rail_port_and_caches() {
        let mut rail = MockRailDataPort::new();
        rail.expect_departures()
            .withf(|stop, destination, _| stop == "Bruxelles-Midi" && destination.is_none())
            .times(1)
            .returning(|_, _, _| Ok(board("IC 1234")));
        let mut retrieval = MockGroundedRetrievalPort::new();
        retrieval.expect_retrieve().never();
        let cache = Arc::new(MemoryCache::default());
        let service = service(rail, retrieval, Arc::clone(&cache));

        let first = service
            .fetch_transport_data("Bruxelles-Midi", Network::Sncb, None, &options())
            .await
            .unwrap();
        let second = service
            .fetch_transport_data(" bruxelles-midi ", Network::Sncb, Some(" "), &options())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.stats().entries, 1);
        let key = cache.keys().pop().unwrap();
        assert_eq!(cache.ttl_of(&key), Some(freshness::DEFAULT));
    }

    #[tokio::test]
    async fn destination_is_forwarded_to_rail() {
        let mut rail = MockRailDataPort::new();
        rail.expect_departures()
            .withf(|_, destination, _| destination.as_deref() == Some("Namur"))
            .times(1)
            .returning(|_, _, _| Ok(board("2-leg itinerary")));
        let service = service(
            rail,
            MockGroundedRetrievalPort::new(),
            Arc::new(MemoryCache::default()),
        );

        service
            .fetch_transport_data("Bruxelles-Midi", Network::Sncb, Some("Namur"), &options())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn other_networks_route_to_smart_service() {
        let mut rail = MockRailDataPort::new();
        rail.expect_departures().never();
        let mut retrieval = MockGroundedRetrievalPort::new();
        retrieval.expect_retrieve().times(1).returning(|_| {
            Ok(RetrievalAnswer {
                text: r#"{"departures":[{"line":"7","destination":"Heysel","time":"08:03","status":"on-time"}]}"#.into(),
                citations: vec![],
            })
        });
        let service = service(rail, retrieval, Arc::new(MemoryCache::default()));

        let result = service
            .fetch_transport_data("Vanderkindere", Network::Stib, None, &options())
            .await
            .unwrap();
        assert_eq!(result.departures[0].line, "7");
        assert_eq!(result.sources[0].uri, "https://www.stib-mivb.be");
    }

    #[tokio::test]
    async fn errors_propagate_and_are_not_cached() {
        let mut rail = MockRailDataPort::new();
        rail.expect_departures()
            .times(2)
            .returning(|_, _, _| Err(ApplicationError::MalformedResponse("eof".into())));
        let cache = Arc::new(MemoryCache::default());
        let service = service(rail, MockGroundedRetrievalPort::new(), Arc::clone(&cache));

        for _ in 0..2 {
            let err = service
                .fetch_transport_data("Gent", Network::Sncb, None, &options())
                .await
                .unwrap_err();
            assert!(err.is_malformed());
        }
        assert_eq!(cache.stats().entries, 0);
    }

    #[tokio::test]
    async fn empty_result_is_success_and_cached() {
        let mut rail = MockRailDataPort::new();
        rail.expect_departures()
            .times(1)
            .returning(|_, _, _| Ok(SearchResult::default()));
        let service = service(
            rail,
            MockGroundedRetrievalPort::new(),
            Arc::new(MemoryCache::default()),
        );

        for _ in 0..2 {
            let result = service
                .fetch_transport_data("Gent", Network::Sncb, None, &options())
                .await
                .unwrap();
            assert!(result.is_empty());
        }
    }

    #[tokio::test]
    async fn blank_stop_is_rejected() {
        let mut rail = MockRailDataPort::new();
        rail.expect_departures().never();
        let service = service(
            rail,
            MockGroundedRetrievalPort::new(),
            Arc::new(MemoryCache::default()),
        );

        let err = service
            .fetch_transport_data("  ", Network::Sncb, None, &options())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidInput(_)));
    }

    /// Rail port that takes a while to answer and counts its calls
    #[derive(Default)]
    struct SlowRail {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RailDataPort for SlowRail {
        async fn departures(
            &self,
            _stop: &str,
            _destination: Option<String>,
            _options: &SearchOptions,
        ) -> Result<SearchResult, ApplicationError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(board("IC 1"))
        }

        async fn station_names(&self) -> Result<Vec<String>, ApplicationError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn concurrent_identical_requests_share_one_upstream_call() {
        let rail = Arc::new(SlowRail::default());
        let service = Arc::new(TransportService::new(
            Arc::clone(&rail) as Arc<dyn RailDataPort>,
            Arc::new(MockGroundedRetrievalPort::new()),
            Arc::new(MemoryCache::default()),
        ));

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .fetch_transport_data("Gent", Network::Sncb, None, &options())
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().departures[0].line, "IC 1");
        }
        assert_eq!(rail.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn freshness_is_clamped() {
        let service = TransportService::new(
            Arc::new(MockRailDataPort::new()),
            Arc::new(MockGroundedRetrievalPort::new()),
            Arc::new(MemoryCache::default()),
        )
        .with_freshness(Duration::from_secs(300));
        assert_eq!(service.freshness(), freshness::MAX);
    }
}
