//! Cache key construction
//!
//! Keys are JSON arrays of the request identity so that no two distinct
//! requests can collide, whatever characters the stop names contain.

use domain::{Network, SearchOptions};
use serde_json::json;

/// Normalize free-text stop input for use in a key
fn stop_component(stop: &str) -> String {
    stop.trim().to_lowercase()
}

/// Key for a departure lookup
///
/// Two requests share a key only when origin, destination (or its absence),
/// date, time and network all match.
#[must_use]
pub fn departures_key(
    stop: &str,
    network: Network,
    destination: Option<&str>,
    options: &SearchOptions,
) -> String {
    json!([
        "departures",
        network.id(),
        stop_component(stop),
        destination.map(stop_component),
        options.date.format("%Y-%m-%d").to_string(),
        options.time.to_string(),
    ])
    .to_string()
}

/// Key for a stop-name search
#[must_use]
pub fn stop_search_key(query: &str, network: Network) -> String {
    json!(["stops", network.id(), stop_component(query)]).to_string()
}
