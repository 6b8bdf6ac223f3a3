//! A cache that remembers nothing.

use std::time::Duration;

use async_trait::async_trait;

use crate::{Cache, CacheResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

#[async_trait]
impl Cache for NoopCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn set_ex_if_counter(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
        _guard: &str,
        _expected: u64,
    ) -> CacheResult<bool> {
        Ok(false)
    }

    async fn delete_pattern(&self, _pattern: &str) -> CacheResult<u64> {
        Ok(0)
    }

    async fn counter(&self, _key: &str) -> CacheResult<u64> {
        Ok(0)
    }

    async fn incr_counter(&self, _key: &str) -> CacheResult<u64> {
        Ok(0)
    }

    async fn health_check(&self) -> CacheResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}
