//! Redis-backed cache.
//!
//! Uses a multiplexed [`ConnectionManager`], which reconnects on its own and
//! is cheap to clone per command. Pattern deletes walk the keyspace with
//! `SCAN MATCH` instead of `KEYS` so a large keyspace never blocks the server.
//! Guarded writes run as a Lua script so the counter check and the `SET` are
//! one atomic step on the server.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

use crate::{Cache, CacheResult};

/// Keys requested per `SCAN` round trip.
const SCAN_BATCH: usize = 200;

/// `KEYS[1]` value key, `KEYS[2]` counter. `ARGV`: value, ttl seconds,
/// expected counter.
const GUARDED_SET_SCRIPT: &str = r"
local current = redis.call('GET', KEYS[2]) or '0'
if current ~= ARGV[3] then
    return 0
end
redis.call('SET', KEYS[1], ARGV[1], 'EX', ARGV[2])
return 1
";

#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
    guarded_set: Script,
}

impl RedisCache {
    /// Open a managed connection to `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        tracing::info!(url = %url, "Connected to Redis");
        Ok(Self {
            manager,
            guarded_set: Script::new(GUARDED_SET_SCRIPT),
        })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        let () = conn.set_ex(key, value, ttl_seconds(ttl)).await?;
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
        let mut conn = self.manager.clone();
        let stored: i64 = self
            .guarded_set
            .key(key)
            .key(guard)
            .arg(value)
            .arg(ttl_seconds(ttl))
            .arg(expected.to_string())
            .invoke_async(&mut conn)
            .await?;
        Ok(stored == 1)
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let mut conn = self.manager.clone();
        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let deleted: u64 = conn.del(&keys).await?;
                removed += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::debug!(pattern = %pattern, removed, "Invalidated cache keys");
        Ok(removed)
    }

    async fn counter(&self, key: &str) -> CacheResult<u64> {
        let mut conn = self.manager.clone();
        let value: Option<u64> = conn.get(key).await?;
        Ok(value.unwrap_or(0))
    }

    async fn incr_counter(&self, key: &str) -> CacheResult<u64> {
        let mut conn = self.manager.clone();
        let value: u64 = conn.incr(key, 1u64).await?;
        Ok(value)
    }

    async fn health_check(&self) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

/// Redis rejects `SET ... EX 0`.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}
