//! multicache - demo cache server
//!
//! Serves cached users and orders over HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use multicache::api::create_router;
use multicache::{spawn_refresh_task, AppState, Config};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the user and order caches and load their first snapshots
/// 4. Start the periodic refresh task (unless disabled)
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "multicache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting multicache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, user_ttl={:?}, order_ttl={:?}, refresh_interval={}s",
        config.server_port, config.user_ttl, config.order_ttl, config.refresh_interval
    );

    let state = AppState::from_config(&config);
    let initial = state.clone();
    let loaded = tokio::task::spawn_blocking(move || initial.refresh_all())
        .await
        .context("initial refresh worker failed")?
        .context("initial cache refresh failed")?;
    for cache in &loaded {
        info!("Cache '{}' loaded with {} entries", cache.name, cache.entries);
    }

    let refresh_handle = if config.refresh_interval > 0 {
        Some(spawn_refresh_task(
            state.refreshables(),
            config.refresh_interval,
        ))
    } else {
        info!("Periodic refresh disabled");
        None
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(refresh_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the refresh task and allows graceful shutdown.
async fn shutdown_signal(refresh_handle: Option<JoinHandle<()>>) {
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

    if let Some(handle) = refresh_handle {
        handle.abort();
        warn!("Refresh task aborted");
    }
}
