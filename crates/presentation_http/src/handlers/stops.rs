//! Stop-name autocomplete handler

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use super::common::parse_network;
use crate::{error::ApiError, state::AppState};

/// Query parameters for `GET /v1/stops`
#[derive(Debug, Default, Deserialize)]
pub struct StopsQuery {
    /// Partial stop name
    #[serde(default)]
    pub q: String,
    pub network: Option<String>,
}

/// Autocomplete suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopsResponse {
    pub stops: Vec<String>,
}

/// Suggest stop names matching a partial query
///
/// Short queries and upstream failures yield fewer (possibly zero)
/// suggestions rather than an error.
pub async fn suggest_stops(
    State(state): State<AppState>,
    Query(query): Query<StopsQuery>,
) -> Result<Json<StopsResponse>, ApiError> {
    let network = parse_network(query.network.as_deref())?;
    let stops = state.resolver.resolve(&query.q, network).await;
    Ok(Json(StopsResponse { stops }))
}
