// sparkpath-gateway - caching HTTP gateway for the SparkPath advisor service

use anyhow::Result;
use clap::Parser;
use sparkpath_gateway::advisor::{Advisor, AdvisorClient};
use sparkpath_gateway::cache::{build_store, CacheAside};
use sparkpath_gateway::cli::Args;
use sparkpath_gateway::config::AppConfig;
use sparkpath_gateway::server::{create_router, AppState};
use sparkpath_gateway::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting sparkpath-gateway v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers.max(1))
        .enable_all()
        .build()?;

    runtime.block_on(run(config))
}

async fn run(config: AppConfig) -> Result<()> {
    // Phase 3: Advisor client and cache layer
    let advisor = Arc::new(AdvisorClient::new(&config.advisor)?);
    let store = build_store(&config.cache)?;
    let cache = CacheAside::new(store, &config.cache);

    // Phase 4: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let probe = config.advisor.probe_on_startup;
    let app = create_router(AppState::new(config, advisor.clone(), cache))?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Best-effort advisor liveness probe; never fatal
    if probe {
        tokio::spawn(async move {
            match advisor.ping().await {
                Ok(()) => info!("Advisor service reachable at {}", advisor.base_url()),
                Err(e) => warn!("Advisor service at {} is not running: {}", advisor.base_url(), e),
            }
        });
    }

    // Phase 6: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
