//! Conversions between caller date/time values and iRail's compact encodings

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;
use domain::ClockTime;

/// Encode a calendar date as `ddmmyy`
#[must_use]
pub fn irail_date(date: NaiveDate) -> String {
    date.format("%d%m%y").to_string()
}

/// Encode a clock time as `HHmm`
#[must_use]
pub fn irail_time(time: ClockTime) -> String {
    time.as_naive().format("%H%M").to_string()
}

/// Local clock time of a Unix timestamp in the given zone
///
/// Returns `None` for timestamps outside chrono's representable range.
#[must_use]
pub fn clock_time_at(epoch_secs: i64, tz: &Tz) -> Option<ClockTime> {
    tz.timestamp_opt(epoch_secs, 0)
        .single()
        .map(|local| ClockTime::from_naive(local.time()))
}

/// Last dot-separated segment of a vehicle identifier, e.g. `BE.NMBS.IC1832` → `IC1832`
#[must_use]
pub fn vehicle_line(vehicle: &str) -> &str {
    vehicle.rsplit('.').next().unwrap_or(vehicle)
}
