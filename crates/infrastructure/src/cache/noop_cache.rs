//! Cache that stores nothing, used when caching is switched off

use std::time::Duration;

use application::{
    error::ApplicationError,
    ports::{CachePort, CacheStats},
};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl CachePort for NoopCache {
    async fn get_bytes(&self, _key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        Ok(None)
    }

    async fn set_bytes(
        &self,
        _key: &str,
        _value: Vec<u8>,
        _ttl: Duration,
    ) -> Result<(), ApplicationError> {
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}
