//! Application configuration
//!
//! Layered: built-in defaults, then an optional `config.toml`, then
//! environment variables such as `BETRANSIT_RETRIEVAL__API_KEY`.
//!
//! - `server`: HTTP server settings
//! - `irail`: rail open-data API client
//! - `retrieval`: grounded retrieval engine
//! - `cache`: result cache freshness and size
//! - `retry`: rate-limit backoff
//! - `logging`: log filter and format

mod cache;
mod logging;
mod server;

use std::path::Path;

use ai_core::InferenceConfig;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use integration_irail::IRailConfig;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

pub use cache::CacheConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;

use crate::retry::RetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BETRANSIT";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Rail open-data API
    #[serde(default)]
    pub irail: IRailConfig,

    /// Grounded retrieval for networks without a structured API
    #[serde(default)]
    pub retrieval: InferenceConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Backoff applied when an upstream rate-limits us
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("irail.base_url", "https://api.irail.be/v1")?
            .set_default("irail.lang", "fr")?
            .set_default("cache.freshness_secs", 45)?
            .set_default("retry.max_retries", 2)?
            .set_default("retry.initial_delay_ms", 1000)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Load configuration from `config.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or does not deserialize.
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name("config").required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from an explicit file, then the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or a source does not deserialize.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from(path).required(true))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// Whether an API key is configured for grounded retrieval
    #[must_use]
    pub fn has_retrieval_key(&self) -> bool {
        self.retrieval
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.irail.validate().map_err(|e| format!("irail: {e}"))?;
        self.retrieval
            .validate()
            .map_err(|e| format!("retrieval: {e}"))?;
        self.cache.validate()?;
        if self.retry.initial_delay_ms == 0 {
            return Err("retry.initial_delay_ms must be greater than 0".to_string());
        }
        if self.retry.max_delay_ms < self.retry.initial_delay_ms {
            return Err("retry.max_delay_ms must not be below retry.initial_delay_ms".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> AppConfig {
        AppConfig::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let config = from_toml("");
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.irail.lang, "fr");
        assert_eq!(config.cache.freshness_secs, 45);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.initial_delay_ms, 1000);
        assert!(!config.has_retrieval_key());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 8080

            [retrieval]
            model = "gemini-2.5-flash"
            api_key = "secret"

            [cache]
            freshness_secs = 30
            max_entries = 500

            [logging]
            json = true
            "#,
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.retrieval.default_model, "gemini-2.5-flash");
        assert!(config.has_retrieval_key());
        assert_eq!(config.cache.max_entries, 500);
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn freshness_outside_window_is_rejected() {
        let config = from_toml("[cache]\nfreshness_secs = 300\n");
        let err = config.validate().unwrap_err();
        assert!(err.contains("freshness_secs"));

        let config = from_toml("[cache]\nfreshness_secs = 10\n");
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_rail_language_is_rejected() {
        let config = from_toml("[irail]\nlang = \"es\"\n");
        assert!(config.validate().unwrap_err().starts_with("irail:"));
    }

    #[test]
    fn zero_retry_delay_is_rejected() {
        let config = from_toml("[retry]\ninitial_delay_ms = 0\n");
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_key_is_not_serialized() {
        let config = from_toml("[retrieval]\napi_key = \"secret\"\n");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(AppConfig::load_from(Path::new("/nonexistent/betransit.toml")).is_err());
    }
}
