//! Key-value cache with expiry used to front FAQ listings.
//!
//! Backends:
//! - [`RedisCache`] -- shared across processes
//! - [`MemoryCache`] -- process-local, for development and tests
//! - [`NoopCache`] -- stores nothing; the FAQ service must stay correct on it
//!
//! The cache is advisory. Callers log and swallow [`CacheError`]s rather than
//! failing a request.

use std::time::Duration;

use async_trait::async_trait;

pub mod memory;
pub mod noop;
pub mod redis_cache;

pub use memory::MemoryCache;
pub use noop::NoopCache;
pub use redis_cache::RedisCache;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

pub type CacheResult<T> = Result<T, CacheError>;

#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch a live value. Expired entries read as `None`.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`, replacing any existing entry, for `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Like [`set_ex`](Self::set_ex), but only while the counter `guard`
    /// still reads `expected`. The check and the write are atomic. Returns
    /// whether the value was stored.
    async fn set_ex_if_counter(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
        guard: &str,
        expected: u64,
    ) -> CacheResult<bool>;

    /// Remove every key matching a glob `pattern` (only a trailing `*` is
    /// significant). Returns the number of keys removed.
    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64>;

    /// Current value of a counter. A counter that was never incremented
    /// reads as 0. Counters do not expire.
    async fn counter(&self, key: &str) -> CacheResult<u64>;

    /// Atomically increment a counter, returning the new value.
    async fn incr_counter(&self, key: &str) -> CacheResult<u64>;

    async fn health_check(&self) -> CacheResult<()>;

    fn backend_name(&self) -> &'static str;
}

/// Whether `key` matches a glob with an optional trailing `*`.
pub(crate) fn matches_pattern(key: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}
