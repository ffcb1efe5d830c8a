//! Rate-limit retry with exponential backoff
//!
//! Upstream calls that fail because the upstream is throttling us are
//! retried after `initial_delay * 2^attempt`; every other failure is
//! returned at once. Sleeping goes through [`Sleeper`] so tests can observe
//! the schedule without waiting.
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::retry::{RetryConfig, retry};
//!
//! let board = retry(&RetryConfig::default(), || client.liveboard(stop, &options)).await?;
//! ```

use std::{future::Future, time::Duration};

use ai_core::InferenceError;
use async_trait::async_trait;
use integration_irail::IRailError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configuration for retry behavior with exponential backoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds (default: 1000ms)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Upper bound on any single delay in milliseconds (default: 30000ms)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Retries after the first attempt (default: 2)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Spread delays randomly around the backoff value (default: false)
    #[serde(default)]
    pub jitter_enabled: bool,

    /// Maximum jitter factor (0.0 to 1.0, default: 0.1 = 10%)
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

const fn default_initial_delay() -> u64 {
    1000
}

const fn default_max_delay() -> u64 {
    30_000
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_jitter_factor() -> f64 {
    0.1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            max_retries: default_max_retries(),
            jitter_enabled: false,
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub const fn new(initial_delay_ms: u64, max_retries: u32) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms: default_max_delay(),
            max_retries,
            jitter_enabled: false,
            jitter_factor: default_jitter_factor(),
        }
    }

    /// Enable jitter with the given factor
    #[must_use]
    pub const fn with_jitter(mut self, factor: f64) -> Self {
        self.jitter_enabled = true;
        self.jitter_factor = factor;
        self
    }

    /// Delay before retry number `attempt` (0-indexed)
    ///
    /// `initial_delay * 2^attempt`, capped at `max_delay`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self
            .initial_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(self.max_delay_ms);

        if !self.jitter_enabled || self.jitter_factor <= 0.0 {
            return Duration::from_millis(base);
        }

        let base = base as f64;
        let range = base * self.jitter_factor.min(1.0);
        let jittered = (base + rand::rng().random_range(-range..=range)).max(0.0);
        Duration::from_millis(jittered as u64)
    }
}

/// Errors that tell whether another attempt may succeed
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for application::ApplicationError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for IRailError {
    fn is_retryable(&self) -> bool {
        self.is_rate_limited()
    }
}

impl Retryable for InferenceError {
    fn is_retryable(&self) -> bool {
        self.is_rate_limited()
    }
}

/// Source of delays between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry result containing either success or the last error
#[derive(Debug)]
pub struct RetryResult<T, E> {
    pub result: Result<T, E>,
    /// Number of attempts made (1 = no retries)
    pub attempts: u32,
}

impl<T, E> RetryResult<T, E> {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Convert to standard Result, discarding metadata
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation`, retrying retryable failures on the given sleeper
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry_using<S, F, Fut, T, E>(
    config: &RetryConfig,
    sleeper: &S,
    mut operation: F,
) -> RetryResult<T, E>
where
    S: Sleeper + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let err = match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(attempts, "Operation succeeded after retries");
                }
                return RetryResult {
                    result: Ok(value),
                    attempts,
                };
            },
            Err(err) => err,
        };

        let retry_attempt = attempts - 1;
        if !err.is_retryable() {
            debug!(attempts, error = %err, "Operation failed with non-retryable error");
            return RetryResult {
                result: Err(err),
                attempts,
            };
        }

        if retry_attempt >= config.max_retries {
            warn!(
                attempts,
                max_retries = config.max_retries,
                error = %err,
                "Still rate limited after max retries"
            );
            return RetryResult {
                result: Err(err),
                attempts,
            };
        }

        let delay = config.delay_for_attempt(retry_attempt);
        warn!(
            attempt = attempts,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            "Rate limited, backing off"
        );
        sleeper.sleep(delay).await;
    }
}

/// Run `operation` with retries on the tokio timer
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    with_retry_using(config, &TokioSleeper, operation).await
}

/// Convenience wrapper around [`with_retry`] that discards metadata
pub async fn retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    with_retry(config, operation).await.into_result()
}
