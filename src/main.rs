//! Peercache - a peer-replicated read-through cache node
//!
//! Serves one demo group backed by an in-process source map; keys this
//! node does not own are delegated to the owning peer over HTTP.

mod api;
mod cache;
mod config;
mod error;
mod group;
mod models;
mod peers;
mod ring;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use group::GroupRegistry;
use peers::HttpPeerPool;

/// Main entry point for the cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the group registry and the demo "scores" group
/// 4. Wire the HTTP peer pool from the configured peer set
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting peercache node");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_bytes={}, port={}, self={}, peers={:?}",
        config.cache_bytes, config.server_port, config.self_addr, config.peer_addrs
    );

    // The demo authoritative source: a fixed in-process score table
    let db: HashMap<String, String> = [("Tom", "630"), ("Jack", "589"), ("Sam", "567")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let registry = Arc::new(GroupRegistry::new());
    let scores = registry.new_group(
        "scores",
        config.cache_bytes,
        Arc::new(move |key: &str| -> anyhow::Result<Vec<u8>> {
            info!(%key, "loading from source");
            db.get(key)
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| anyhow::anyhow!("{} not found in source", key))
        }),
    );

    // Wire the peer pool so keys owned by other nodes are delegated
    let pool = Arc::new(HttpPeerPool::new(&config.self_addr));
    pool.set_peers(&config.peer_addrs);
    if let Err(err) = scores.register_peers(pool) {
        error!(%err, "failed to register peers");
        std::process::exit(1);
    }
    info!("Peer pool wired for {} peers", config.peer_addrs.len());

    // Create router with all endpoints
    let app = create_router(AppState::new(registry));

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Node listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Node shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
