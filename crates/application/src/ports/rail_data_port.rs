//! Rail data port
//!
//! Structured journey data for the national rail network.

use async_trait::async_trait;
use domain::{SearchOptions, SearchResult};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the rail network's structured open-data API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RailDataPort: Send + Sync {
    /// Normalized departures from `stop`
    ///
    /// Without a destination this is the station's liveboard; with one it is
    /// the list of planned connections, each possibly made of several legs.
    async fn departures(
        &self,
        stop: &str,
        destination: Option<String>,
        options: &SearchOptions,
    ) -> Result<SearchResult, ApplicationError>;

    /// Names of every station in the network
    async fn station_names(&self) -> Result<Vec<String>, ApplicationError>;
}
