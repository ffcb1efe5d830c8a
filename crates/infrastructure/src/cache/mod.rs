//! Cache implementations
//!
//! - `MokaCache`: bounded in-memory cache with per-entry freshness
//! - `NoopCache`: stores nothing, for running with caching disabled

mod moka_cache;
mod noop_cache;

pub use moka_cache::{DEFAULT_MAX_ENTRIES, MokaCache};
pub use noop_cache::NoopCache;
