//! Health check handler

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache: CacheSummary,
}

/// Result cache counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSummary {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Liveness check
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.cache.stats();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: CacheSummary {
            entries: stats.entries,
            hits: stats.hits,
            misses: stats.misses,
        },
    })
}
