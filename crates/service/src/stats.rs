//! Counters for the FAQ read path.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub(crate) struct ServiceStats {
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub translations_created: AtomicU64,
    pub translation_failures: AtomicU64,
}

impl ServiceStats {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            translations_created: self.translations_created.load(Ordering::Relaxed),
            translation_failures: self.translation_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the service counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub translations_created: u64,
    /// Gaps that could not be translated or persisted. Each one is retried on
    /// the next cache-miss read of its language.
    pub translation_failures: u64,
}
