//! Result cache configuration.

use std::time::Duration;

use application::ports::freshness;
use serde::{Deserialize, Serialize};

use super::default_true;
use crate::cache::DEFAULT_MAX_ENTRIES;

/// Result cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds a departure or stop answer is served from cache (30 to 60)
    #[serde(default = "default_freshness_secs")]
    pub freshness_secs: u64,

    /// Maximum number of stored entries
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

const fn default_freshness_secs() -> u64 {
    freshness::DEFAULT.as_secs()
}

const fn default_max_entries() -> u64 {
    DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            freshness_secs: default_freshness_secs(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }

    /// Validate the section
    ///
    /// # Errors
    ///
    /// Returns an error if the freshness window is outside 30 to 60 seconds
    /// or the entry bound is zero.
    pub fn validate(&self) -> Result<(), String> {
        let window = self.freshness();
        if window < freshness::MIN || window > freshness::MAX {
            return Err(format!(
                "cache.freshness_secs must be between {} and {}, got {}",
                freshness::MIN.as_secs(),
                freshness::MAX.as_secs(),
                self.freshness_secs
            ));
        }
        if self.max_entries == 0 {
            return Err("cache.max_entries must be greater than 0".to_string());
        }
        Ok(())
    }
}
