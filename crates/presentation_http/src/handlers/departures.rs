//! Departure board handler

use axum::{
    Json,
    extract::{Query, State},
};
use domain::SearchResult;
use serde::Deserialize;
use tracing::instrument;

use super::common::{parse_network, parse_search_options};
use crate::{error::ApiError, state::AppState};

/// Query parameters for `GET /v1/departures`
#[derive(Debug, Default, Deserialize)]
pub struct DeparturesQuery {
    /// Stop name to depart from
    pub stop: Option<String>,
    /// `sncb`, `stib` or `delijn`; rail when absent
    pub network: Option<String>,
    /// Destination stop
    pub to: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM`
    pub time: Option<String>,
}

/// Upcoming departures for a stop
#[instrument(skip(state), fields(stop = ?query.stop, network = ?query.network))]
pub async fn list_departures(
    State(state): State<AppState>,
    Query(query): Query<DeparturesQuery>,
) -> Result<Json<SearchResult>, ApiError> {
    let stop = query
        .stop
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing 'stop' parameter".to_string()))?;
    let network = parse_network(query.network.as_deref())?;
    let options = parse_search_options(query.date.as_deref(), query.time.as_deref())?;

    let result = state
        .transport
        .fetch_transport_data(stop, network, query.to.as_deref(), &options)
        .await?;

    Ok(Json(result))
}
