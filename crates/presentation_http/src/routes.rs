//! Route definitions

use axum::{Router, routing::get};

use crate::{handlers, state::AppState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/v1/departures", get(handlers::departures::list_departures))
        .route("/v1/stops", get(handlers::stops::suggest_stops))
        .with_state(state)
}
