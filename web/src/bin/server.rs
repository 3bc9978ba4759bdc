//! Registration server binary.
//!
//! Run with: `cargo run --bin registration-server`

use anyhow::Context;
use registration_airtable::AirtableClient;
use registration_core::{RegistrationProcessor, SystemClock};
use registration_web::{AppState, Config, build_router, metrics};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(config.server.env_filter().context("Invalid log filter")?)
        .with(fmt::layer())
        .init();

    tracing::info!("Starting registration server");
    tracing::info!(
        inscription_table = %config.processor.inscription_table,
        validation_table = %config.processor.validation_table,
        duplicate_codes = ?config.processor.duplicate_codes,
        "Configuration loaded"
    );

    let metrics_addr: SocketAddr = format!("{}:{}", config.server.metrics_host, config.server.metrics_port)
        .parse()
        .context("Invalid metrics address")?;
    metrics::install_exporter(metrics_addr).context("Failed to install Prometheus exporter")?;

    let client = AirtableClient::new(config.airtable).context("Failed to build Airtable client")?;
    let processor = RegistrationProcessor::new(Arc::new(client), Arc::new(SystemClock), config.processor);

    let app = build_router(AppState::new(Arc::new(processor)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout);
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    // Drain in-flight requests, but no longer than the configured timeout
    // once the signal has arrived.
    tokio::select! {
        result = server.into_future() => result.context("Server error")?,
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!(timeout_secs = shutdown_timeout.as_secs(), "Shutdown timeout elapsed, exiting");
        }
    }

    tracing::info!("Server shut down");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and treated as never firing.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
