//! Replay orchestrator - feeds recorded events through handler and dispatcher.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{MarketEvent, Publisher, SessionState, UploaderConfig};
use dispatcher::{create_dispatcher, DispatchReport, Dispatcher, LogPublisher};
use ingestion::{handle_event, EventOutcome};
use observability::UploadMetricsAggregator;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Loaded uploader configuration
    pub uploader: UploaderConfig,

    /// JSON lines file of recorded `MarketEvent`s
    pub events_path: PathBuf,

    /// Maximum number of events to replay (None = unlimited)
    pub max_events: Option<u64>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Replay pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the replay to completion with the log publisher behind pub/sub
    pub async fn run(self) -> Result<PipelineStats> {
        self.run_with_publisher(LogPublisher::new()).await
    }

    /// Run the replay to completion
    ///
    /// # Errors
    /// Unreadable input, a malformed event line, or a sink that cannot be
    /// built. Delivery failures are counted, not returned.
    pub async fn run_with_publisher<P: Publisher + Sync>(
        self,
        publisher: P,
    ) -> Result<PipelineStats> {
        let start_time = Instant::now();

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let dispatcher = create_dispatcher(&self.config.uploader, publisher)
            .context("Failed to create dispatcher")?;

        let mut session = SessionState::at(
            self.config
                .uploader
                .session
                .location_id
                .clone()
                .unwrap_or_default(),
        );

        let file = tokio::fs::File::open(&self.config.events_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to open events file {}",
                    self.config.events_path.display()
                )
            })?;
        let mut lines = BufReader::new(file).lines();

        let mut stats = PipelineStats {
            active_sinks: dispatcher.sink_count(),
            ..Default::default()
        };
        let mut line_no: u64 = 0;

        info!(
            events = %self.config.events_path.display(),
            location = %session.location_id,
            sinks = stats.active_sinks,
            "Replay started"
        );

        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read events file")?
        {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let event: MarketEvent = serde_json::from_str(&line)
                .with_context(|| format!("Malformed event on line {}", line_no))?;

            stats.events_read += 1;
            if matches!(event, MarketEvent::OffersResponse(_)) {
                stats.responses += 1;
            }

            process_event(&mut session, &dispatcher, &event, &mut stats.upload_metrics).await;

            if let Some(max) = self.config.max_events {
                if stats.events_read >= max {
                    info!(max_events = max, "Reached event limit, stopping replay");
                    break;
                }
            }
        }

        stats.duration = start_time.elapsed();
        stats.final_location = session.location_id;

        for (name, snapshot) in dispatcher.metrics() {
            debug!(
                sink = %name,
                delivered = snapshot.delivered_count,
                failed = snapshot.failure_count,
                orders = snapshot.orders_delivered,
                "Sink totals"
            );
        }

        Ok(stats)
    }
}

/// Handle one event and dispatch the batch it produces, if any
pub async fn process_event<P: Publisher + Sync>(
    session: &mut SessionState,
    dispatcher: &Dispatcher<P>,
    event: &MarketEvent,
    metrics: &mut UploadMetricsAggregator,
) -> Option<DispatchReport> {
    let outcome = handle_event(session, event);
    metrics.record_rejected(outcome.rejected().len());

    match outcome {
        EventOutcome::InvalidLocation => {
            metrics.record_discarded_response();
            None
        }
        EventOutcome::Batch { batch, .. } => {
            metrics.record_batch(batch.len());
            let report = dispatcher.dispatch(&batch).await;
            for outcome in &report.outcomes {
                metrics.record_delivery(&outcome.sink, outcome.is_delivered());
            }
            if !report.all_delivered() {
                warn!(
                    correlation_id = %report.correlation_id,
                    failed = report.failed(),
                    "Some sinks did not receive the batch"
                );
            }
            Some(report)
        }
        EventOutcome::Requested | EventOutcome::LocationUpdated | EventOutcome::Empty { .. } => {
            None
        }
    }
}
