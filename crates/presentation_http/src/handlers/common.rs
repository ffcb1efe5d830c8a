//! Query-string parsing shared by the departure and stop handlers

use chrono::NaiveDate;
use domain::{ClockTime, Network, SearchOptions};

use crate::error::ApiError;

/// Parse an optional network parameter, defaulting to rail
pub fn parse_network(raw: Option<&str>) -> Result<Network, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value
            .parse()
            .map_err(|e: domain::DomainError| ApiError::BadRequest(e.to_string())),
        None => Ok(Network::default()),
    }
}

/// Build search options from optional `YYYY-MM-DD` and `HH:MM` parameters
///
/// Missing parts are taken from the current Brussels time.
pub fn parse_search_options(
    date: Option<&str>,
    time: Option<&str>,
) -> Result<SearchOptions, ApiError> {
    let mut options = SearchOptions::now();

    if let Some(raw) = date.map(str::trim).filter(|s| !s.is_empty()) {
        options.date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("Invalid date '{raw}', expected YYYY-MM-DD")))?;
    }
    if let Some(raw) = time.map(str::trim).filter(|s| !s.is_empty()) {
        options.time = raw
            .parse::<ClockTime>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid time '{raw}', expected HH:MM")))?;
    }

    Ok(options)
}
