//! # Pricing API Server
//!
//! ```text
//! env ──► ServerConfig ──► load_pricing_config (fail fast) ──► EngineHandle
//!                                                                  │
//!                          TcpListener::bind ◄── app(state) ◄──────┘
//!                                 │
//!                                 ▼
//!                    serve until Ctrl+C / SIGTERM
//! ```

use anyhow::Context;
use mitre_pricing_api::config::{load_pricing_config, ServerConfig};
use mitre_pricing_api::{app, AppState, EngineHandle};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Mitre Pricing API v{}", env!("CARGO_PKG_VERSION"));

    let server = ServerConfig::load().context("Failed to load server configuration")?;
    let pricing = load_pricing_config(server.pricing_config_path.as_deref())
        .context("Failed to load pricing configuration")?;

    info!(
        tax_rate_bps = pricing.tax_rate_bps,
        sheet_measure = %pricing.sheet_measure,
        frames = pricing.catalog.frames.len(),
        "Pricing configuration loaded"
    );

    let handle = EngineHandle::from_config(pricing, server.pricing_config_path.clone())
        .context("Pricing configuration is invalid")?;
    let router = app(AppState::new(handle));

    let addr = server.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Pricing API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Pricing API shut down");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
