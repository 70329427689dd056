//! `replay` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ReplayArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `replay` command
pub async fn run_replay(args: &ReplayArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }
    if !args.events.exists() {
        anyhow::bail!("Events file not found: {}", args.events.display());
    }

    let mut uploader = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref location) = args.location {
        info!(location = %location, "Overriding session location from CLI");
        uploader.session.location_id = Some(location.clone());
    }

    info!(
        sinks = uploader.sinks.len(),
        location = ?uploader.session.location_id,
        "Configuration loaded"
    );

    let pipeline = Pipeline::new(PipelineConfig {
        uploader,
        events_path: args.events.clone(),
        max_events: (args.max_events > 0).then_some(args.max_events),
        metrics_port: (args.metrics_port > 0).then_some(args.metrics_port),
    });

    tokio::select! {
        result = pipeline.run() => {
            let stats = result.context("Replay failed")?;
            info!(
                events = stats.events_read,
                batches = stats.upload_metrics.total_batches,
                orders = stats.upload_metrics.total_orders,
                duration_secs = stats.duration.as_secs_f64(),
                "Replay completed"
            );
            stats.print_summary();
        }
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping replay...");
        }
    }

    info!("Market Uploader finished");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
///
/// A handler that cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
