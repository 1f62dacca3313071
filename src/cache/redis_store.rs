// Redis-backed cache store

use super::store::CacheStore;
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// After a failed connection attempt, calls fail fast for this long instead
/// of each request waiting on its own connect timeout.
const RECONNECT_COOLDOWN: Duration = Duration::from_secs(5);

#[derive(Default)]
struct ConnectionState {
    manager: Option<ConnectionManager>,
    retry_after: Option<Instant>,
}

/// [`CacheStore`] backed by Redis.
///
/// The connection is established lazily so the gateway starts (and keeps
/// serving uncached) while Redis is down. Every call is bounded by the
/// configured timeout.
pub struct RedisStore {
    client: redis::Client,
    state: Mutex<ConnectionState>,
    timeout: Duration,
}

impl RedisStore {
    /// Parse the URL without connecting.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            state: Mutex::new(ConnectionState::default()),
            timeout,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let mut state = self.state.lock().await;
        if let Some(manager) = &state.manager {
            return Ok(manager.clone());
        }
        if let Some(retry_after) = state.retry_after {
            if Instant::now() < retry_after {
                return Err(GatewayError::CacheStore("redis unavailable".to_string()));
            }
        }

        match tokio::time::timeout(self.timeout, ConnectionManager::new(self.client.clone())).await
        {
            Ok(Ok(manager)) => {
                debug!("Connected to redis");
                state.manager = Some(manager.clone());
                state.retry_after = None;
                Ok(manager)
            }
            Ok(Err(e)) => {
                warn!("Redis connection failed: {}", e);
                state.retry_after = Some(Instant::now() + RECONNECT_COOLDOWN);
                Err(e.into())
            }
            Err(_) => {
                warn!("Redis connection timed out after {:?}", self.timeout);
                state.retry_after = Some(Instant::now() + RECONNECT_COOLDOWN);
                Err(GatewayError::CacheStore("connection timed out".to_string()))
            }
        }
    }

    async fn timed<T, F>(&self, op: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result.map_err(GatewayError::from),
            Err(_) => Err(GatewayError::CacheStore(format!(
                "operation timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        self.timed(conn.get::<_, Option<String>>(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;
        let seconds = ttl.as_secs().max(1);
        self.timed(conn.set_ex::<_, _, ()>(key, value, seconds)).await
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
        let mut conn = self.connection().await?;
        let pattern = format!("{}*", escape_glob(prefix));

        let keys: Vec<String> = self
            .timed(async {
                let mut iter = conn.scan_match::<_, String>(&pattern).await?;
                let mut keys = Vec::new();
                while let Some(key) = iter.next_item().await {
                    keys.push(key);
                }
                Ok::<_, redis::RedisError>(keys)
            })
            .await?;

        if keys.is_empty() {
            return Ok(0);
        }
        self.timed(conn.del::<_, u64>(keys)).await
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: String = self.timed(redis::cmd("PING").query_async(&mut conn)).await?;
        Ok(())
    }
}

/// Escape glob metacharacters so a prefix matches literally in `SCAN MATCH`.
fn escape_glob(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
