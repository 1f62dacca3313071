//! Configuration data structures for the SparkPath gateway.
//!
//! This module defines the schema for the application settings: the HTTP
//! listener, cross-origin policy, the upstream advisor service, the cache
//! layer and its per-operation TTLs, conversation limits and logging.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, workers).
    #[serde(default)]
    pub server: ServerConfig,

    /// Cross-origin policy.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Upstream advisor (AI generation) service settings.
    #[serde(default)]
    pub advisor: AdvisorConfig,

    /// Cache-aside layer settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Mentor conversation settings.
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `0.0.0.0`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `4000`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of tokio worker threads.
    /// Default: Number of logical CPU cores.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum accepted request body size in bytes.
    /// Default: `1048576` (1 MiB)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Cross-origin resource sharing settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// The only origin allowed to call the API. When unset any origin is accepted.
    #[serde(default)]
    pub frontend_base_url: Option<String>,
}

/// Settings for the upstream advisor service connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Base URL of the advisor service.
    /// Default: `http://127.0.0.1:5000`
    #[serde(default = "default_advisor_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Generation calls are slow.
    /// Default: `120`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connection timeout in seconds.
    /// Default: `10`
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Whether to probe the advisor's liveness endpoint at startup.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub probe_on_startup: bool,
}

/// Settings for the cache-aside layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether responses are memoized at all.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Redis connection URL. When unset an in-process store is used.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Namespace prepended to every key written to the store.
    /// Default: `sparkpath`
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Capacity of the in-process store. Least recently used entries are
    /// evicted beyond it. Ignored when Redis is configured.
    /// Default: `10000`
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Per-call timeout for store operations in milliseconds.
    /// Default: `500`
    #[serde(default = "default_cache_timeout_ms")]
    pub timeout_ms: u64,

    /// Per-operation TTLs.
    #[serde(default)]
    pub ttl: CacheTtlConfig,
}

/// Time-to-live, in seconds, for each memoized operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    #[serde(default = "default_ttl_day")]
    pub roadmap: u64,
    #[serde(default = "default_ttl_day")]
    pub task_guidance: u64,
    #[serde(default = "default_ttl_half_day")]
    pub failure_prediction: u64,
    #[serde(default = "default_ttl_day")]
    pub swot_analysis: u64,
    #[serde(default = "default_ttl_week")]
    pub checklist: u64,
    #[serde(default = "default_ttl_week")]
    pub checklist_details: u64,
}

/// Settings for mentor conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConversationConfig {
    /// Keep only this many most recent turns per session. `0` keeps everything.
    #[serde(default)]
    pub max_turns: usize,

    /// On reset, also delete `conversation:<session>:` keys from the cache
    /// store. Each reset scans the store's keyspace.
    /// Default: `false`
    #[serde(default)]
    pub clear_cache_on_reset: bool,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask credentials embedded in URLs before logging them.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_secrets: bool,
}

impl AdvisorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl CacheConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            base_url: default_advisor_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            probe_on_startup: true,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: None,
            key_prefix: default_key_prefix(),
            max_entries: default_max_entries(),
            timeout_ms: default_cache_timeout_ms(),
            ttl: CacheTtlConfig::default(),
        }
    }
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            roadmap: default_ttl_day(),
            task_guidance: default_ttl_day(),
            failure_prediction: default_ttl_half_day(),
            swot_analysis: default_ttl_day(),
            checklist: default_ttl_week(),
            checklist_details: default_ttl_week(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_secrets: true,
        }
    }
}

// Helper functions for serde defaults
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_body_limit() -> usize {
    1024 * 1024
}

fn default_advisor_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_key_prefix() -> String {
    "sparkpath".to_string()
}

fn default_max_entries() -> usize {
    10_000
}

fn default_cache_timeout_ms() -> u64 {
    500
}

fn default_ttl_half_day() -> u64 {
    12 * 60 * 60
}

fn default_ttl_day() -> u64 {
    24 * 60 * 60
}

fn default_ttl_week() -> u64 {
    7 * 24 * 60 * 60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
