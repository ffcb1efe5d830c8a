//! Wall-clock time value object

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

/// A local wall-clock time with minute precision, rendered as `HH:mm`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Create a clock time from hours and minutes
    ///
    /// # Errors
    ///
    /// Returns an error if the hour or minute is out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, DomainError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidTime(format!("{hour:02}:{minute:02}")))
    }

    /// Truncate a [`NaiveTime`] to minute precision
    #[must_use]
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time))
    }

    /// The underlying [`NaiveTime`]
    #[must_use]
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = DomainError;

    /// Accepts `HH:mm`, `H:mm`, `HH:mm:ss` and the French `14h05` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ["%H:%M", "%H:%M:%S", "%Hh%M"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
            .map(Self::from_naive)
            .ok_or_else(|| DomainError::InvalidTime(s.to_string()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
