//! Per-key in-flight de-duplication.
//!
//! At most one holder per key at a time. Concurrent callers for the same key
//! queue behind the current holder; once it finishes they re-check the cache
//! and normally find the leader's result there.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct SingleFlight {
    flights: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds `key`, then hold it until the
    /// returned guard is dropped.
    pub async fn acquire(&self, key: &str) -> FlightGuard<'_> {
        let lock = {
            let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(flights.entry(key.to_string()).or_default())
        };
        let guard = lock.lock_owned().await;
        FlightGuard {
            owner: self,
            key: key.to_string(),
            _guard: guard,
        }
    }

    /// Number of keys currently held or waited on.
    pub fn in_flight(&self) -> usize {
        self.flights
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct FlightGuard<'a> {
    owner: &'a SingleFlight,
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut flights = self
            .owner
            .flights
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Two references left means the table and this guard: nobody waits.
        if flights
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) <= 2)
        {
            flights.remove(&self.key);
        }
    }
}
