//! # PicoFI Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PicoFI Server                                    │
//! │                                                                         │
//! │  Browser ───► HTTP (ADDR) ───► routes ───► SessionStore (memory, TTL)  │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                              RenderCache                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use picofi_web::{app, init_tracing, WebConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting PicoFI server...");

    let config = WebConfig::load().context("loading configuration")?;
    info!(
        addr = %config.addr,
        currency = %config.currency,
        session_ttl_secs = config.session_ttl.as_secs(),
        "Configuration loaded"
    );

    let (state, router) = app(&config);

    let sweeper = config
        .sweep_interval
        .map(|every| state.sessions.spawn_sweeper(every));

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!(addr = %config.addr, "server is listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving requests")?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, closing idle connections...");
}
