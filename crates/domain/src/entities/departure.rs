//! Departures and itinerary legs

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{errors::DomainError, value_objects::ClockTime};

/// Operational state of a departure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DepartureStatus {
    /// Running to schedule
    #[default]
    #[serde(alias = "ontime", alias = "on_time")]
    OnTime,
    /// Running late
    Delayed,
    /// Will not run
    #[serde(alias = "canceled")]
    Cancelled,
}

impl DepartureStatus {
    /// Derive the status from raw service state
    ///
    /// Cancellation takes precedence over delay.
    #[must_use]
    pub const fn from_service_state(delay_secs: i64, cancelled: bool) -> Self {
        if cancelled {
            Self::Cancelled
        } else if delay_secs > 0 {
            Self::Delayed
        } else {
            Self::OnTime
        }
    }
}

impl fmt::Display for DepartureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTime => write!(f, "on-time"),
            Self::Delayed => write!(f, "delayed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Human-readable delay annotation, `+N min` (whole minutes, rounded down)
///
/// Returns `None` when the service is not late.
#[must_use]
pub fn delay_label(delay_secs: i64) -> Option<String> {
    (delay_secs > 0).then(|| format!("+{} min", delay_secs / 60))
}

/// One single-vehicle segment of a multi-vehicle itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// Vehicle designation
    pub line: String,
    pub departure_station: String,
    pub departure_time: ClockTime,
    pub arrival_station: String,
    pub arrival_time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
}

/// One boarding opportunity presented to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    /// Identifier, unique within one response
    pub id: String,
    /// Service label, or a synthetic label for multi-vehicle itineraries
    pub line: String,
    /// Final destination of the trip
    pub destination: String,
    /// Departure time at the origin stop
    pub time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default)]
    pub status: DepartureStatus,
    /// Arrival time at the final destination, itineraries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<ClockTime>,
    /// Vehicle segments, present only when more than one vehicle is needed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legs: Vec<Leg>,
}

impl Departure {
    /// Create an on-time departure without legs
    pub fn new(
        id: impl Into<String>,
        line: impl Into<String>,
        destination: impl Into<String>,
        time: ClockTime,
    ) -> Self {
        Self {
            id: id.into(),
            line: line.into(),
            destination: destination.into(),
            time,
            delay: None,
            platform: None,
            status: DepartureStatus::OnTime,
            arrival_time: None,
            legs: Vec::new(),
        }
    }

    /// Apply raw delay and cancellation state
    #[must_use]
    pub fn with_service_state(mut self, delay_secs: i64, cancelled: bool) -> Self {
        self.delay = delay_label(delay_secs);
        self.status = DepartureStatus::from_service_state(delay_secs, cancelled);
        self
    }

    /// Set the boarding platform
    #[must_use]
    pub fn with_platform(mut self, platform: Option<String>) -> Self {
        self.platform = platform.filter(|p| !p.trim().is_empty());
        self
    }

    /// Aggregate a sequence of legs into one itinerary departure
    ///
    /// Time, delay and platform come from the first leg; the destination and
    /// arrival time from the last. The status is derived from the first leg's
    /// raw state exactly as for a single departure.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidItinerary`] if `legs` is empty, if a leg
    /// does not start where the previous one ended, or if a leg departs
    /// before the previous one arrives.
    pub fn itinerary(
        id: impl Into<String>,
        legs: Vec<Leg>,
        first_leg_delay_secs: i64,
        first_leg_cancelled: bool,
    ) -> Result<Self, DomainError> {
        let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
            return Err(DomainError::invalid_itinerary("no legs"));
        };

        for (index, pair) in legs.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            if current.arrival_station != next.departure_station {
                return Err(DomainError::invalid_itinerary(format!(
                    "leg {} ends at {} but leg {} starts at {}",
                    index,
                    current.arrival_station,
                    index + 1,
                    next.departure_station
                )));
            }
            if current.arrival_time > next.departure_time && !crosses_midnight(current, next) {
                return Err(DomainError::invalid_itinerary(format!(
                    "leg {} departs at {} before leg {} arrives at {}",
                    index + 1,
                    next.departure_time,
                    index,
                    current.arrival_time
                )));
            }
        }

        let line = if legs.len() == 1 {
            first.line.clone()
        } else {
            format!("{}-leg itinerary", legs.len())
        };

        let departure = Self {
            id: id.into(),
            line,
            destination: last.arrival_station.clone(),
            time: first.departure_time,
            delay: first.delay.clone(),
            platform: first.platform.clone(),
            status: DepartureStatus::from_service_state(first_leg_delay_secs, first_leg_cancelled),
            arrival_time: Some(last.arrival_time),
            legs: if legs.len() > 1 { legs } else { Vec::new() },
        };

        Ok(departure)
    }

    /// Number of vehicles needed for this departure
    #[must_use]
    pub fn vehicle_count(&self) -> usize {
        self.legs.len().max(1)
    }

    /// Whether this departure requires changing vehicles
    #[must_use]
    pub fn has_interchange(&self) -> bool {
        self.legs.len() > 1
    }
}

/// An interchange late in the evening may connect to a service after midnight
fn crosses_midnight(current: &Leg, next: &Leg) -> bool {
    current.arrival_time.as_naive().hour() >= 18 && next.departure_time.as_naive().hour() < 6
}
