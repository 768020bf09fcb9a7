//! Axum API server binary.

use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use facemerge_api::{create_router, metrics, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Provider credentials are required; fail before anything else starts
    let config = AppConfig::from_env().context("Invalid configuration")?;

    init_tracing(config.api.json_logs)?;

    info!("Starting facemerge-api");
    info!(
        "API config: host={}, port={}, static_dir={}",
        config.api.host,
        config.api.port,
        config.api.static_dir.display()
    );
    if config.providers.azure.is_none() {
        warn!("Azure Face API not configured, consensus routes will use Face++ only");
    }

    let addr: SocketAddr = format!("{}:{}", config.api.host, config.api.port)
        .parse()
        .context("Invalid bind address")?;

    let metrics_handle = if config.api.metrics_enabled {
        info!("Prometheus metrics enabled at /metrics");
        Some(metrics::init_metrics().context("Failed to install Prometheus recorder")?)
    } else {
        None
    };

    let state = AppState::new(config).context("Failed to create provider clients")?;

    let app = create_router(state, metrics_handle);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Colored text output, or JSON lines when `use_json` is set.
fn init_tracing(use_json: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive("facemerge=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
