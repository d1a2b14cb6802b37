//! Chatwoot Gateway - webhook receiver.
//!
//! This binary provides the web server that:
//! - Receives Chatwoot webhooks
//! - Verifies HMAC signatures
//! - Filters for incoming customer messages
//! - Deduplicates events against Redis
//!
//! Downstream processing hangs off the "processed" outcome and is a
//! stub for now.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gateway::store::RedisDedupeStore;
use gateway::web::{is_signature_verification_enabled, router, AppState};
use gateway::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        signature_verification_enabled =
            is_signature_verification_enabled(&config.webhook_secret),
        dedupe_ttl_seconds = config.dedupe_ttl_seconds,
        "config_loaded"
    );

    // Create the Redis-backed dedupe store
    let dedupe =
        RedisDedupeStore::new(&config.redis_url).context("Failed to create Redis client")?;
    info!("dedupe_store_created");

    // Create application state
    let port = config.port;
    let state = AppState::new(config, Arc::new(dedupe));

    // Build the router
    let app = router(state).layer(TraceLayer::new_for_http());

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
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
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
