//! Feedlens Server
//!
//! Analyzes user feedback for sentiment, emotion and theme using hosted
//! inference models, and serves the results over HTTP.

use anyhow::Result;
use clap::Parser;
use feedlens_server::{create_router, AppState, Cli, ServerConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Feedlens server");

    let config = ServerConfig::load(&cli.config, &cli)?;
    info!(
        config = %cli.config,
        call_ceiling = config.batch.call_ceiling,
        chunk_size = config.batch.chunk_size,
        environment = %config.cors.environment,
        "Configuration loaded"
    );

    let metrics_handle = init_metrics()?;

    let state = AppState::new(config, metrics_handle).await?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", cli.listen, cli.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
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
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new(
            "feedlens_server=debug,feedlens_classifiers=debug,feedlens_store=debug,tower_http=debug",
        )
    } else {
        EnvFilter::try_from_env("FEEDLENS_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| {
                EnvFilter::new("feedlens_server=info,feedlens_classifiers=info,feedlens_store=info")
            })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "feedlens_requests_total",
        "Total number of analysis requests by route"
    );
    metrics::describe_counter!(
        "feedlens_items_analyzed_total",
        "Feedback items admitted for analysis"
    );
    metrics::describe_counter!(
        "feedlens_items_dropped_total",
        "Feedback items dropped by the outbound call ceiling"
    );
    metrics::describe_counter!(
        "feedlens_analysis_fallbacks_total",
        "Results replaced by the default after a failure"
    );
    metrics::describe_histogram!(
        "feedlens_batch_latency_us",
        metrics::Unit::Microseconds,
        "Batch analysis latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
