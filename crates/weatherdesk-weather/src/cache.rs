//! Short-lived key/value cache for lookup results.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;
use serde_json::Value;

/// Get/set-with-expiry store. Values are kept serialized so an external
/// key/value service can stand behind the same interface.
///
/// A miss must only ever cost latency: callers refetch on `None`.
pub trait WeatherCache: Send + Sync {
    /// Unexpired value for `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key` for `ttl`. A zero TTL stores nothing.
    fn set(&self, key: &str, value: Value, ttl: Duration);
}

impl<T: WeatherCache + ?Sized> WeatherCache for Arc<T> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        (**self).set(key, value, ttl)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    ttl: Duration,
}

/// Each entry lives for the TTL it was stored with; an overwrite restarts it.
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Bounded in-process cache backed by moka.
///
/// Expired entries are never returned; capacity is enforced by moka's
/// eviction policy once its pending maintenance runs.
#[derive(Clone)]
pub struct InMemoryCache {
    entries: Cache<String, CacheEntry>,
}

impl std::fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("entry_count", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}

impl InMemoryCache {
    pub fn new(max_entries: usize) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries.max(1) as u64)
            .expire_after(EntryTtl)
            .eviction_listener(|key, _, cause| {
                tracing::debug!(key = %key, ?cause, "Cache entry removed");
            })
            .build();

        Self { entries }
    }

    /// Live entry count, after flushing moka's pending maintenance.
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl WeatherCache for InMemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value)
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        if ttl.is_zero() {
            self.entries.invalidate(key);
            return;
        }

        self.entries.insert(key.to_string(), CacheEntry { value, ttl });
    }
}
