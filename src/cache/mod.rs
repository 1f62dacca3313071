// Cache-aside layer: keys, stores and the get-or-compute helper

pub mod aside;
pub mod keys;
pub mod models;
pub mod redis_store;
pub mod store;

pub use aside::CacheAside;
pub use keys::{CacheKey, Operation};
pub use models::{CacheOutcome, CacheStats, Cached};
pub use redis_store::RedisStore;
pub use store::{CacheStore, MemoryStore};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::utils::logging::redact_url;
use std::sync::Arc;
use tracing::info;

/// Build the store selected by `config`: Redis when a URL is configured,
/// otherwise the in-process store.
pub fn build_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>> {
    match &config.redis_url {
        Some(url) if !url.trim().is_empty() => {
            info!("Using redis cache store at {}", redact_url(url));
            Ok(Arc::new(RedisStore::new(url, config.timeout())?))
        }
        _ => {
            info!("Using in-memory cache store ({} entries max)", config.max_entries);
            Ok(Arc::new(MemoryStore::with_capacity(config.max_entries)))
        }
    }
}
