// Configuration module

mod models;

pub use models::*;

use crate::error::{GatewayError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Variables understood by earlier deployments of the service, mapped onto
/// their configuration keys.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("FRONTEND_BASE_URL", "cors.frontend_base_url"),
    ("PYTHON_SERVER_URL", "advisor.base_url"),
    ("REDIS_URL", "cache.redis_url"),
];

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Legacy environment variables (highest)
    /// 2. Environment variables (`SPARKPATH__SECTION__KEY`)
    /// 3. Config file (explicit path, or `~/.sparkpath/config.toml`)
    /// 4. Defaults (lowest)
    ///
    /// CLI flags are applied on top by the binary.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Self::default_config_path()).required(false),
        };

        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(Environment::with_prefix("SPARKPATH").separator("__"));

        for (var, key) in LEGACY_ENV {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config = builder
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| GatewayError::Config(e.to_string()))
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sparkpath")
            .join("config.toml")
    }
}
