//! iRail HTTP client
//!
//! Wraps the liveboard, connections and stations endpoints of
//! [api.irail.be](https://api.irail.be).

use std::time::Duration;

use async_trait::async_trait;
use domain::SearchOptions;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::IRailConfig;
use crate::error::IRailError;
use crate::format::{irail_date, irail_time};
use crate::models::{ConnectionsResponse, LiveboardResponse, RailResponse, Station, StationsResponse};

/// Trait for rail data clients
#[async_trait]
pub trait RailClient: Send + Sync {
    /// Departure board of one station
    async fn liveboard(
        &self,
        station: &str,
        options: &SearchOptions,
    ) -> Result<LiveboardResponse, IRailError>;

    /// Planned trips between two stations
    async fn connections(
        &self,
        from: &str,
        to: &str,
        options: &SearchOptions,
    ) -> Result<ConnectionsResponse, IRailError>;

    /// Full station directory
    async fn stations(&self) -> Result<Vec<Station>, IRailError>;

    /// Liveboard when no destination is given, connections otherwise
    async fn journeys(
        &self,
        from: &str,
        to: Option<&str>,
        options: &SearchOptions,
    ) -> Result<RailResponse, IRailError> {
        match to {
            Some(to) => self
                .connections(from, to, options)
                .await
                .map(RailResponse::Connections),
            None => self
                .liveboard(from, options)
                .await
                .map(RailResponse::Liveboard),
        }
    }
}

/// Client for the iRail open-data API
#[derive(Debug)]
pub struct IRailClient {
    client: Client,
    config: IRailConfig,
}

impl IRailClient {
    /// Create a new iRail client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &IRailConfig) -> Result<Self, IRailError> {
        config.validate().map_err(IRailError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| IRailError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}/", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// GET an endpoint and decode its JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        subject: &str,
    ) -> Result<T, IRailError> {
        let url = self.url(endpoint);
        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("format", "json".to_string()));
        query.push(("lang", self.config.lang.clone()));

        debug!(%url, "Querying iRail");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IRailError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    IRailError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            warn!(?retry_after_secs, "iRail rate limit hit");
            return Err(IRailError::RateLimitExceeded { retry_after_secs });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(IRailError::StationNotFound(subject.to_string()));
        }

        if !status.is_success() {
            return Err(IRailError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| IRailError::ConnectionFailed(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| IRailError::ParseError(e.to_string()))
    }

    fn time_params(options: &SearchOptions) -> [(&'static str, String); 2] {
        [
            ("date", irail_date(options.date)),
            ("time", irail_time(options.time)),
        ]
    }
}

#[async_trait]
impl RailClient for IRailClient {
    #[instrument(skip(self, options), fields(date = %options.date, time = %options.time))]
    async fn liveboard(
        &self,
        station: &str,
        options: &SearchOptions,
    ) -> Result<LiveboardResponse, IRailError> {
        let mut params = vec![("station", station.to_string())];
        params.extend(Self::time_params(options));

        let board: LiveboardResponse = self.get_json("liveboard", &params, station).await?;
        debug!(count = board.departures.departure.len(), "Liveboard fetched");
        Ok(board)
    }

    #[instrument(skip(self, options), fields(date = %options.date, time = %options.time))]
    async fn connections(
        &self,
        from: &str,
        to: &str,
        options: &SearchOptions,
    ) -> Result<ConnectionsResponse, IRailError> {
        let mut params = vec![
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("timesel", "departure".to_string()),
        ];
        params.extend(Self::time_params(options));

        let subject = format!("{from} → {to}");
        let connections: ConnectionsResponse =
            self.get_json("connections", &params, &subject).await?;

        if connections.connection.is_empty() {
            warn!("No connections found");
        }
        debug!(count = connections.connection.len(), "Connections fetched");
        Ok(connections)
    }

    #[instrument(skip(self))]
    async fn stations(&self) -> Result<Vec<Station>, IRailError> {
        let directory: StationsResponse = self.get_json("stations", &[], "stations").await?;
        debug!(count = directory.station.len(), "Station directory fetched");
        Ok(directory.station)
    }
}
