//! Itinerary normalization
//!
//! Turns either iRail journey shape into the uniform [`SearchResult`].
//!
//! A connection with `n` vias becomes `n + 1` legs:
//!
//! ```text
//! departure ──leg 0──▶ via[0] ──leg 1──▶ via[1] ── … ──leg n──▶ arrival
//! ```
//!
//! Leg 0 starts from the connection's `departure` object. Leg `i + 1` starts
//! from `via[i].departure` (vias carry no top-level time). Every leg ends at
//! the next via's `arrival`, or at the connection's final `arrival`.

use chrono_tz::Tz;
use domain::{BRUSSELS, ClockTime, Departure, GroundingSource, Leg, SearchResult, delay_label};
use tracing::debug;

use crate::error::IRailError;
use crate::format::{clock_time_at, vehicle_line};
use crate::models::{RailResponse, RawConnection, RawEvent, RawLiveboardEntry, RawVia};

/// Provenance title attached to every rail result
pub const IRAIL_SOURCE_TITLE: &str = "iRail API (Open Data)";

/// Provenance URI attached to every rail result
pub const IRAIL_SOURCE_URI: &str = "https://irail.be";

/// Converts raw iRail responses into departures
#[derive(Debug, Clone, Copy)]
pub struct ItineraryNormalizer {
    timezone: Tz,
}

impl Default for ItineraryNormalizer {
    fn default() -> Self {
        Self::new(BRUSSELS)
    }
}

/// Where a leg ends
#[derive(Clone, Copy)]
struct Target<'a> {
    station: &'a str,
    time: i64,
}

impl ItineraryNormalizer {
    /// Create a normalizer rendering times in the given zone
    #[must_use]
    pub const fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Normalize a decoded response
    ///
    /// # Errors
    ///
    /// Returns [`IRailError::ParseError`] if a timestamp is out of range or a
    /// connection's legs do not chain.
    pub fn normalize(&self, response: &RailResponse) -> Result<SearchResult, IRailError> {
        let departures = match response {
            RailResponse::Liveboard(board) => board
                .departures
                .departure
                .iter()
                .enumerate()
                .map(|(index, entry)| self.liveboard_departure(index, entry))
                .collect::<Result<Vec<_>, _>>()?,
            RailResponse::Connections(connections) => connections
                .connection
                .iter()
                .enumerate()
                .map(|(index, connection)| self.connection_departure(index, connection))
                .collect::<Result<Vec<_>, _>>()?,
        };

        debug!(count = departures.len(), "Normalized rail departures");

        Ok(SearchResult::new(departures)
            .with_source(GroundingSource::new(IRAIL_SOURCE_TITLE, IRAIL_SOURCE_URI)))
    }

    fn liveboard_departure(
        &self,
        index: usize,
        entry: &RawLiveboardEntry,
    ) -> Result<Departure, IRailError> {
        let id = entry
            .id
            .clone()
            .unwrap_or_else(|| format!("dep-{index}"));

        Ok(Departure::new(
            id,
            vehicle_line(&entry.vehicle),
            entry.station.clone(),
            self.clock(entry.time)?,
        )
        .with_service_state(entry.delay, entry.canceled)
        .with_platform(entry.platform.clone()))
    }

    fn connection_departure(
        &self,
        index: usize,
        connection: &RawConnection,
    ) -> Result<Departure, IRailError> {
        let legs = self.build_legs(connection)?;

        Departure::itinerary(
            format!("conn-{index}"),
            legs,
            connection.departure.delay,
            connection.departure.canceled,
        )
        .map_err(|e| IRailError::ParseError(format!("connection {index}: {e}")))
    }

    fn build_legs(&self, connection: &RawConnection) -> Result<Vec<Leg>, IRailError> {
        let vias = connection.vias();
        let origin = station_of(&connection.departure, "departure")?;
        let destination = Target {
            station: station_of(&connection.arrival, "arrival")?,
            time: connection.arrival.time,
        };

        let mut legs = Vec::with_capacity(vias.len() + 1);
        legs.push(self.leg(
            origin,
            &connection.departure,
            connection.departure.vehicle.as_deref().unwrap_or_default(),
            &target_after(vias, destination, 0),
        )?);

        for (i, via) in vias.iter().enumerate() {
            if via.departure.time < via.arrival.time {
                return Err(IRailError::ParseError(format!(
                    "via {} at {} departs before it is reached",
                    i, via.station
                )));
            }
            legs.push(self.leg(
                &via.station,
                &via.departure,
                via.onward_vehicle(),
                &target_after(vias, destination, i + 1),
            )?);
        }

        Ok(legs)
    }

    fn leg(
        &self,
        from: &str,
        boarding: &RawEvent,
        vehicle: &str,
        target: &Target<'_>,
    ) -> Result<Leg, IRailError> {
        Ok(Leg {
            line: vehicle_line(vehicle).to_string(),
            departure_station: from.to_string(),
            departure_time: self.clock(boarding.time)?,
            arrival_station: target.station.to_string(),
            arrival_time: self.clock(target.time)?,
            platform: boarding.platform.clone(),
            delay: delay_label(boarding.delay),
        })
    }

    fn clock(&self, epoch_secs: i64) -> Result<ClockTime, IRailError> {
        clock_time_at(epoch_secs, &self.timezone)
            .ok_or_else(|| IRailError::ParseError(format!("timestamp out of range: {epoch_secs}")))
    }
}

/// End of the leg boarded before `vias[position]`, or the final arrival
fn target_after<'a>(vias: &'a [RawVia], destination: Target<'a>, position: usize) -> Target<'a> {
    vias.get(position).map_or(destination, |via| Target {
        station: &via.station,
        time: via.arrival.time,
    })
}

fn station_of<'a>(event: &'a RawEvent, which: &str) -> Result<&'a str, IRailError> {
    event
        .station
        .as_deref()
        .ok_or_else(|| IRailError::ParseError(format!("connection {which} has no station")))
}
