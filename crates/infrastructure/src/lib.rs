//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the iRail and
//! Gemini adapters, the in-memory result cache, the retry policy,
//! configuration loading and logging setup.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod retry;
pub mod telemetry;
pub mod wiring;

pub use adapters::*;
pub use cache::{MokaCache, NoopCache};
pub use config::{AppConfig, CacheConfig, LoggingConfig, ServerConfig};
pub use retry::{RetryConfig, RetryResult, Retryable, Sleeper, TokioSleeper, retry, with_retry};
pub use telemetry::{TelemetryError, init_logging};
pub use wiring::{Services, build_services};
