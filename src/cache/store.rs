//! Key-value stores with per-entry TTL.
//!
//! [`CacheStore`] is the seam between the cache-aside helper and whatever
//! holds the bytes. Production deployments point it at Redis
//! ([`super::RedisStore`]); [`MemoryStore`] keeps the same semantics inside
//! the process, within a fixed capacity, and backs local runs and tests.

use crate::error::Result;
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// A key-value store holding serialized JSON payloads with a TTL.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name used in logs and health output.
    fn name(&self) -> &'static str;

    /// Fetch a live value. Expired or unknown keys yield `None`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove every key starting with `prefix`. Returns how many were removed.
    async fn delete_prefix(&self, prefix: &str) -> Result<u64>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Capacity used by [`MemoryStore::new`].
pub const DEFAULT_MEMORY_CAPACITY: usize = 10_000;

/// Expired entries that are never read again are swept at most this often.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

struct MemoryInner {
    entries: LruCache<String, MemoryEntry>,
    next_sweep: Instant,
}

impl MemoryInner {
    fn sweep_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.expires_at <= now)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            self.entries.pop(key);
        }
        if !expired.is_empty() {
            debug!("Swept {} expired entries", expired.len());
        }
        self.next_sweep = now + SWEEP_INTERVAL;
    }
}

/// In-process [`CacheStore`] bounded to a fixed number of entries.
///
/// The least recently used entry is evicted when a write would exceed the
/// capacity. Expired entries are dropped on read and swept periodically on
/// write.
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    /// Store holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(MemoryInner {
                entries: LruCache::new(capacity),
                next_sweep: Instant::now() + SWEEP_INTERVAL,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().entries.cap().get()
    }

    /// Number of entries currently held, including ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        match inner.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
        }

        debug!("Dropping expired entry {}", key);
        inner.entries.pop(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        if now >= inner.next_sweep {
            inner.sweep_expired(now);
        }

        let entry = MemoryEntry {
            value: value.to_string(),
            expires_at: now + ttl,
        };
        if let Some((evicted, _)) = inner.entries.push(key.to_string(), entry) {
            if evicted != key {
                debug!("Evicted least recently used entry {}", evicted);
            }
        }
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
        let mut inner = self.inner.lock();
        let matching: Vec<String> = inner
            .entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &matching {
            inner.entries.pop(key);
        }
        Ok(matching.len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
