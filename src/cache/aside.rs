// Cache-aside helper - get-or-compute-and-store over a CacheStore

use super::keys::CacheKey;
use super::models::{CacheOutcome, CacheStats, Cached};
use super::store::CacheStore;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::metrics;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    bypasses: AtomicU64,
    store_errors: AtomicU64,
}

/// Memoizes producer results in a [`CacheStore`].
///
/// A store that is unreachable or holds malformed data never fails the
/// caller: the producer runs and its result is returned uncached. There is
/// no single-flight de-duplication, so concurrent misses on the same key
/// each run the producer.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    enabled: bool,
    prefix: String,
    counters: Arc<Counters>,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            enabled: config.enabled,
            prefix: config.key_prefix.clone(),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Name of the backing store.
    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn storage_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.prefix, key)
        }
    }

    /// Return the cached value for `key`, or run `producer` and store its
    /// result for `ttl`.
    ///
    /// Producer errors are returned as-is and never cached.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        producer: F,
    ) -> std::result::Result<Cached<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if !self.enabled {
            let value = producer().await?;
            return Ok(Cached {
                value,
                outcome: CacheOutcome::Disabled,
            });
        }

        let storage_key = self.storage_key(key.as_str());
        let outcome = match self.store.get(&storage_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!("Cache hit: {}", key);
                    self.record(CacheOutcome::Hit);
                    return Ok(Cached {
                        value,
                        outcome: CacheOutcome::Hit,
                    });
                }
                Err(e) => {
                    warn!("Malformed cache entry for {}: {}", key, e);
                    CacheOutcome::Bypass
                }
            },
            Ok(None) => {
                debug!("Cache miss: {}", key);
                CacheOutcome::Miss
            }
            Err(e) => {
                warn!("Cache store read failed for {}: {}", key, e);
                CacheOutcome::Bypass
            }
        };
        self.record(outcome);

        let value = producer().await?;

        if outcome == CacheOutcome::Miss {
            self.write(&storage_key, &value, ttl).await;
        }

        Ok(Cached { value, outcome })
    }

    async fn write<T: Serialize>(&self, storage_key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cannot serialize value for {}: {}", storage_key, e);
                return;
            }
        };

        match self.store.set(storage_key, &raw, ttl).await {
            Ok(()) => {
                self.counters.stores.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_operation("store");
            }
            Err(e) => {
                warn!("Cache store write failed for {}: {}", storage_key, e);
                self.counters.store_errors.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_operation("store_error");
            }
        }
    }

    fn record(&self, outcome: CacheOutcome) {
        let counter = match outcome {
            CacheOutcome::Hit => &self.counters.hits,
            CacheOutcome::Miss => &self.counters.misses,
            CacheOutcome::Bypass => &self.counters.bypasses,
            CacheOutcome::Disabled => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::record_cache_operation(outcome.as_str());
    }

    /// Remove every entry under `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &CacheKey) -> Result<u64> {
        let removed = self
            .store
            .delete_prefix(&self.storage_key(prefix.as_str()))
            .await?;
        debug!("Invalidated {} entries under {}", removed, prefix);
        Ok(removed)
    }

    /// Fire-and-forget [`Self::invalidate_prefix`]. Failures are only logged.
    pub fn spawn_invalidate_prefix(&self, prefix: CacheKey) {
        if !self.enabled {
            return;
        }
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(e) = this.invalidate_prefix(&prefix).await {
                warn!("Cache invalidation of {} failed: {}", prefix, e);
            }
        });
    }

    /// Check that the backing store is reachable.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stores: self.counters.stores.load(Ordering::Relaxed),
            bypasses: self.counters.bypasses.load(Ordering::Relaxed),
            store_errors: self.counters.store_errors.load(Ordering::Relaxed),
        }
    }
}
