//! Servlet container front end.
//!
//! Serves every configured deployment from one listener, mapping each
//! request to a servlet by its url-patterns.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────────┐
//!                         │                 SERVLET ROUTER                    │
//!   Client Request        │  ┌────────┐   ┌────────────┐   ┌───────────────┐  │
//!   ──────────────────────┼─▶│  http  │──▶│ deployment │──▶│    routing    │  │
//!                         │  │ server │   │  (context  │   │ (mapping table│  │
//!                         │  └────────┘   │  selection)│   │   resolve)    │  │
//!                         │       ▲       └────────────┘   └───────┬───────┘  │
//!   Client Response       │       │                                │          │
//!   ◀─────────────────────┼───────┴──────── servlet echo ◀─────────┘          │
//!                         │                                                   │
//!                         │  config (TOML, watcher) · observability · lifecycle│
//!                         └───────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use servlet_router::config::watcher::ConfigWatcher;
use servlet_router::config::{load_config, ContainerConfig};
use servlet_router::deployment::{apply_updates, Container};
use servlet_router::lifecycle::{signals, Shutdown};
use servlet_router::observability::{logging, metrics};
use servlet_router::HttpServer;

#[derive(Parser)]
#[command(name = "servlet-router")]
#[command(about = "Serve deployments by servlet url-pattern mapping", long_about = None)]
struct Args {
    /// Container configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload mapping tables when the configuration file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ContainerConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("servlet-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        deployments = config.deployments.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Every deployment must build before the listener opens.
    let container = Arc::new(Container::from_config(&config)?);

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let _watcher = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let handle = watcher.run()?;
            tokio::spawn(apply_updates(container.clone(), updates, shutdown.subscribe()));
            Some(handle)
        }
        _ => None,
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, container);
    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
