//! Hornets dashboard server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser ──▶ http server ──▶ access control ──▶ pages / auth / players API
//!                                      │                     │
//!                                      ▼                     ▼
//!                               session store         identity provider
//!                                                     stats API (balldontlie)
//! ```
//!
//! Configuration comes from an optional TOML file named by `DASHBOARD_CONFIG`,
//! overlaid with `.env` and the process environment.

use std::path::PathBuf;

use tokio::net::TcpListener;

use hornets_dashboard::config::load_from_env;
use hornets_dashboard::lifecycle::{wait_for_signal, Shutdown};
use hornets_dashboard::net::load_tls_config;
use hornets_dashboard::observability::{logging, metrics};
use hornets_dashboard::DashboardServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var_os("DASHBOARD_CONFIG").map(PathBuf::from);
    let config = load_from_env(config_path.as_deref())?;

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "hornets-dashboard starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        team = %config.stats_api.team_name,
        season = config.stats_api.dashboard_season,
        tls = config.listener.tls.is_some(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let tls = match &config.listener.tls {
        Some(tls) => Some(load_tls_config(tls).await?),
        None => None,
    };
    let bind_address = config.listener.bind_address.clone();

    let server = DashboardServer::new(config)?;
    let shutdown = Shutdown::new();
    server.spawn_background(&shutdown);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    match tls {
        Some(tls) => {
            let listener = std::net::TcpListener::bind(&bind_address)?;
            server.run_tls(listener, tls, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            server.run(listener, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
