//! Search reference moment

use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::ClockTime;

/// Timezone in which every Belgian network publishes its timetables
pub const BRUSSELS: Tz = chrono_tz::Europe::Brussels;

/// The date and time a departure search refers to
///
/// Both parts are always present; the moment is not necessarily "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Calendar date of the query
    pub date: NaiveDate,
    /// Clock time of the query, minute precision
    pub time: ClockTime,
}

impl SearchOptions {
    /// Create options for an explicit date and time
    #[must_use]
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time: ClockTime::from_naive(time),
        }
    }

    /// The current moment in Brussels local time
    #[must_use]
    pub fn now() -> Self {
        let local = Utc::now().with_timezone(&BRUSSELS);
        Self::new(local.date_naive(), local.time())
    }

    /// Human-readable form used in retrieval prompts, e.g. `2026-10-19 08:30`
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} {}", self.date.format("%Y-%m-%d"), self.time)
    }
}
