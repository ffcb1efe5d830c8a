//! iRail client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the iRail open-data API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IRailConfig {
    /// Base URL including the API version segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language for station names (`fr`, `nl`, `de`, `en`)
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request; iRail asks clients to identify themselves
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.irail.be/v1".to_string()
}

fn default_lang() -> String {
    "fr".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("betransit/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for IRailConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            lang: default_lang(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl IRailConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if !matches!(self.lang.as_str(), "fr" | "nl" | "de" | "en") {
            return Err(format!("unsupported lang '{}'", self.lang));
        }

        Ok(())
    }
}
