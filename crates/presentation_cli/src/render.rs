//! Terminal output for departure boards and failures

use std::fmt::Write as _;

use application::ApplicationError;
use domain::{Departure, DepartureStatus, Network, SearchResult};

/// Exit status for an upstream rate limit
pub const EXIT_RATE_LIMITED: u8 = 3;
/// Exit status for an unreachable upstream
pub const EXIT_UNAVAILABLE: u8 = 4;
/// Exit status for an unreadable upstream answer
pub const EXIT_MALFORMED: u8 = 5;
/// Exit status for unusable arguments
pub const EXIT_USAGE: u8 = 2;

/// Process exit status for a failed search
#[must_use]
pub const fn exit_code(err: &ApplicationError) -> u8 {
    match err {
        ApplicationError::RateLimited => EXIT_RATE_LIMITED,
        ApplicationError::ExternalService(_) => EXIT_UNAVAILABLE,
        ApplicationError::MalformedResponse(_) => EXIT_MALFORMED,
        ApplicationError::InvalidInput(_)
        | ApplicationError::Domain(_)
        | ApplicationError::NotFound(_) => EXIT_USAGE,
        ApplicationError::Configuration(_) | ApplicationError::Internal(_) => 1,
    }
}

/// User-facing explanation of a failed search
#[must_use]
pub fn failure_message(err: &ApplicationError) -> String {
    match err {
        ApplicationError::RateLimited => {
            "The transit service is receiving too many requests. Wait a minute and try again."
                .to_string()
        },
        ApplicationError::ExternalService(detail) => {
            format!("Could not reach the transit service: {detail}")
        },
        ApplicationError::MalformedResponse(detail) => {
            format!("The transit service sent data that could not be read: {detail}")
        },
        ApplicationError::NotFound(stop) => format!("Unknown stop: {stop}"),
        other => other.to_string(),
    }
}

/// Message shown when a search succeeds with no departures
#[must_use]
pub fn empty_message(stop: &str, network: Network) -> String {
    format!("No upcoming departures from {stop} ({network}).")
}

fn status_marker(status: DepartureStatus) -> &'static str {
    match status {
        DepartureStatus::OnTime => "",
        DepartureStatus::Delayed => "delayed",
        DepartureStatus::Cancelled => "CANCELLED",
    }
}

fn departure_line(departure: &Departure) -> String {
    let mut line = format!(
        "{}  {:<10} {}",
        departure.time, departure.line, departure.destination
    );
    if let Some(arrival) = departure.arrival_time {
        let _ = write!(line, " (arr. {arrival})");
    }
    if let Some(delay) = &departure.delay {
        let _ = write!(line, "  {delay}");
    }
    if let Some(platform) = &departure.platform {
        let _ = write!(line, "  pl. {platform}");
    }
    let marker = status_marker(departure.status);
    if !marker.is_empty() {
        let _ = write!(line, "  {marker}");
    }
    line
}

/// Plain-text departure board
#[must_use]
pub fn board(result: &SearchResult) -> String {
    let mut out = String::new();
    for departure in &result.departures {
        let _ = writeln!(out, "{}", departure_line(departure));
        if departure.has_interchange() {
            for leg in &departure.legs {
                let _ = writeln!(
                    out,
                    "       {} {} → {} {}  {}",
                    leg.departure_time,
                    leg.departure_station,
                    leg.arrival_station,
                    leg.arrival_time,
                    leg.line
                );
            }
        }
    }
    if !result.sources.is_empty() {
        out.push_str("\nSources:\n");
        for source in &result.sources {
            let _ = writeln!(out, "  {} <{}>", source.title, source.uri);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use domain::{ClockTime, GroundingSource};

    use super::*;

    fn departure() -> Departure {
        Departure::new("dep-0", "IC1234", "Namur", ClockTime::from_hm(8, 0).unwrap())
    }

    #[test]
    fn failure_classes_have_distinct_exit_codes() {
        let rate = exit_code(&ApplicationError::RateLimited);
        let down = exit_code(&ApplicationError::ExternalService("timeout".into()));
        let bad = exit_code(&ApplicationError::MalformedResponse("eof".into()));
        assert_ne!(rate, down);
        assert_ne!(down, bad);
        assert_ne!(rate, bad);
        assert!(rate != 0 && down != 0 && bad != 0);
    }

    #[test]
    fn rate_limit_message_asks_to_wait() {
        let msg = failure_message(&ApplicationError::RateLimited);
        assert!(msg.contains("try again"));
    }

    #[test]
    fn board_shows_delay_platform_and_status() {
        let dep = departure()
            .with_service_state(180, false)
            .with_platform(Some("5".into()));
        let result = SearchResult::new(vec![dep])
            .with_source(GroundingSource::new("iRail API (Open Data)", "https://irail.be"));

        let out = board(&result);

        assert!(out.starts_with("08:00  IC1234"));
        assert!(out.contains("+3 min"));
        assert!(out.contains("pl. 5"));
        assert!(out.contains("delayed"));
        assert!(out.contains("<https://irail.be>"));
    }

    #[test]
    fn cancelled_departure_is_flagged() {
        let out = board(&SearchResult::new(vec![departure().with_service_state(0, true)]));
        assert!(out.contains("CANCELLED"));
    }

    #[test]
    fn empty_message_names_the_stop() {
        assert_eq!(
            empty_message("Ottignies", Network::Sncb),
            "No upcoming departures from Ottignies (SNCB)."
        );
    }
}
