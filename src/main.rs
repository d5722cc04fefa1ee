//! route-tree server.
//!
//! Serves the route table declared in a TOML file. Every configured route
//! answers with a JSON echo of the matched pattern and its captures; anything
//! else is a 404.
//!
//! ```text
//!   request ──▶ axum (trace, request id, timeout) ──▶ Router::dispatch
//!                                                        │
//!                                           PathTree lookup (literal → :var → *)
//!                                                        │
//!                                             handler(request, captures) / 404
//!
//!   config file ──▶ watcher (validate, Router::from_config) ──▶ swap_routers ──▶ ArcSwap::store
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use route_tree::config::watcher::ConfigWatcher;
use route_tree::config::{load_config, RouterConfig};
use route_tree::http::swap_routers;
use route_tree::lifecycle::signals::wait_for_signal;
use route_tree::observability::{logging, metrics};
use route_tree::{HttpServer, Router, Shutdown};

#[derive(Parser)]
#[command(name = "route-tree")]
#[command(about = "Serve a tree-routed table of paths", long_about = None)]
struct Cli {
    /// Route table and server settings (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the route table when the config file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("route-tree v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    let router = Router::from_config(&config.routes).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;
    tracing::debug!("Routing table:\n{}", router);

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, router);

    // Held for the lifetime of the process; dropping it stops the watch.
    let _watcher = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            tokio::spawn(swap_routers(updates, server.router_handle(), shutdown.subscribe()));
            Some(watcher.run()?)
        }
        _ => None,
    };

    let signals = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_signal(&signals).await {
            tracing::error!(error = %e, "Failed to install signal handlers");
        }
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
