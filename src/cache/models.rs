//! Cache lookup results and statistics.

use serde::Serialize;

/// How a cache-aside lookup was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from the store; the producer did not run.
    Hit,
    /// Not in the store; the producer ran and its result was written back.
    Miss,
    /// The store failed or held malformed data; the producer ran uncached.
    Bypass,
    /// Caching is turned off.
    Disabled,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Bypass => "bypass",
            CacheOutcome::Disabled => "disabled",
        }
    }
}

/// A value together with how it was obtained.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub value: T,
    pub outcome: CacheOutcome,
}

/// Statistics for cache operations.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups answered from the store.
    pub hits: u64,
    /// Number of lookups that found nothing.
    pub misses: u64,
    /// Number of values written back after a miss.
    pub stores: u64,
    /// Number of lookups that skipped the cache because the store failed.
    pub bypasses: u64,
    /// Number of failed write-backs.
    pub store_errors: u64,
}
