//! Process-local cache: a capacity-bounded LRU with per-entry expiry.
//!
//! Expiry uses `tokio::time::Instant`, so tests can drive it with a paused
//! clock. Expired entries are dropped on read; the least recently used entry
//! is evicted once the cache is full. Counters live beside the LRU and are
//! never evicted.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::{matches_pattern, Cache, CacheResult};

/// Entries kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 512;

struct Entry {
    value: String,
    expires_at: Instant,
}

struct Inner {
    entries: LruCache<String, Entry>,
    counters: HashMap<String, u64>,
}

impl Inner {
    fn put(&mut self, key: &str, value: &str, ttl: Duration) {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.put(key.to_string(), entry);
    }

    fn counter(&self, key: &str) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }
}

pub struct MemoryCache {
    inner: Mutex<Inner>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A cache holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                counters: HashMap::new(),
            }),
        }
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.inner
            .lock()
            .entries
            .iter()
            .filter(|(_, e)| e.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut inner = self.inner.lock();
        let Some(entry) = inner.entries.get(key) else {
            return Ok(None);
        };
        if entry.expires_at > Instant::now() {
            return Ok(Some(entry.value.clone()));
        }
        inner.entries.pop(key);
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.inner.lock().put(key, value, ttl);
        Ok(())
    }

    async fn set_ex_if_counter(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
        guard: &str,
        expected: u64,
    ) -> CacheResult<bool> {
        let mut inner = self.inner.lock();
        if inner.counter(guard) != expected {
            return Ok(false);
        }
        inner.put(key, value, ttl);
        Ok(true)
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let mut inner = self.inner.lock();
        let doomed: Vec<String> = inner
            .entries
            .iter()
            .filter(|(key, _)| matches_pattern(key, pattern))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            inner.entries.pop(key);
        }
        Ok(doomed.len() as u64)
    }

    async fn counter(&self, key: &str) -> CacheResult<u64> {
        Ok(self.inner.lock().counter(key))
    }

    async fn incr_counter(&self, key: &str) -> CacheResult<u64> {
        let mut inner = self.inner.lock();
        let value = inner.counters.entry(key.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn health_check(&self) -> CacheResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let cache = MemoryCache::new();
        cache.set_ex("faqs:en", "[]", HOUR).await.unwrap();
        assert_eq!(cache.get("faqs:en").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(cache.get("faqs:hi").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache.set_ex("faqs:en", "[]", HOUR).await.unwrap();

        tokio::time::advance(HOUR - Duration::from_secs(1)).await;
        assert!(cache.get("faqs:en").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("faqs:en").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn delete_pattern_removes_whole_namespace_only() {
        let cache = MemoryCache::new();
        for key in ["faqs:en", "faqs:hi", "faqs:fr", "other:en"] {
            cache.set_ex(key, "[]", HOUR).await.unwrap();
        }

        let removed = cache.delete_pattern("faqs:*").await.unwrap();
        assert_eq!(removed, 3);
        assert!(cache.get("faqs:hi").await.unwrap().is_none());
        assert!(cache.get("other:en").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn overwrite_replaces_value() {
        let cache = MemoryCache::new();
        cache.set_ex("faqs:en", "old", HOUR).await.unwrap();
        cache.set_ex("faqs:en", "new", HOUR).await.unwrap();
        assert_eq!(cache.get("faqs:en").await.unwrap().as_deref(), Some("new"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn capacity_bounds_distinct_keys() {
        let cache = MemoryCache::with_capacity(3);
        for lang in ["aa", "ab", "ac", "ad", "ae"] {
            cache.set_ex(&format!("faqs:{lang}"), "[]", HOUR).await.unwrap();
        }

        assert_eq!(cache.len().await, 3);
        assert!(cache.get("faqs:aa").await.unwrap().is_none(), "oldest entry evicted");
        assert!(cache.get("faqs:ae").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn recently_read_entry_survives_eviction() {
        let cache = MemoryCache::with_capacity(2);
        cache.set_ex("faqs:en", "[]", HOUR).await.unwrap();
        cache.set_ex("faqs:hi", "[]", HOUR).await.unwrap();
        cache.get("faqs:en").await.unwrap();

        cache.set_ex("faqs:fr", "[]", HOUR).await.unwrap();

        assert!(cache.get("faqs:en").await.unwrap().is_some());
        assert!(cache.get("faqs:hi").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn guarded_write_only_lands_on_expected_counter() {
        let cache = MemoryCache::new();
        assert_eq!(cache.counter("gen").await.unwrap(), 0);

        assert!(cache.set_ex_if_counter("faqs:hi", "v0", HOUR, "gen", 0).await.unwrap());
        assert_eq!(cache.incr_counter("gen").await.unwrap(), 1);
        assert!(!cache.set_ex_if_counter("faqs:hi", "stale", HOUR, "gen", 0).await.unwrap());

        assert_eq!(cache.get("faqs:hi").await.unwrap().as_deref(), Some("v0"));
    }

    #[tokio::test]
    async fn counters_are_not_evicted_or_pattern_deleted() {
        let cache = MemoryCache::with_capacity(1);
        cache.incr_counter("faqs-generation").await.unwrap();
        cache.set_ex("faqs:en", "[]", HOUR).await.unwrap();
        cache.set_ex("faqs:hi", "[]", HOUR).await.unwrap();
        cache.delete_pattern("faqs*").await.unwrap();

        assert_eq!(cache.counter("faqs-generation").await.unwrap(), 1);
    }
}
