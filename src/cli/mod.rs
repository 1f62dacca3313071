// CLI module for sparkpath-gateway

use clap::Parser;
use std::path::PathBuf;

/// sparkpath-gateway - caching HTTP gateway in front of the SparkPath advisor service
#[derive(Parser, Debug)]
#[command(name = "sparkpath-gateway", version, about, long_about = None)]
pub struct Args {
    /// Configuration file (TOML). Defaults to ~/.sparkpath/config.toml when present
    #[arg(short, long, env = "SPARKPATH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind, overriding the configuration
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip the advisor liveness probe at startup
    #[arg(long)]
    pub no_probe: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut crate::config::AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_probe {
            config.advisor.probe_on_startup = false;
        }
    }
}
