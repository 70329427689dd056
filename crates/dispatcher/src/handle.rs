//! SinkHandle - wraps a sink with its metrics and outcome reporting

use std::time::Instant;

use tracing::{error, info};

use contracts::{DataSink, SinkOutcome, UploadBatch};

use crate::metrics::SinkMetrics;

/// Handle to one configured sink
///
/// Turns the sink's `Result` into a tagged `SinkOutcome`, so a failure
/// never leaves the handle.
pub struct SinkHandle<S> {
    sink: S,
    metrics: SinkMetrics,
}

impl<S: DataSink + Sync> SinkHandle<S> {
    /// Wrap a sink
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            metrics: SinkMetrics::new(),
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        self.sink.name()
    }

    /// Get the wrapped sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get current metrics
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Deliver a batch and record the outcome
    pub async fn deliver(&self, batch: &UploadBatch) -> SinkOutcome {
        let name = self.name();
        let started = Instant::now();
        let result = self.sink.deliver(batch).await;

        let elapsed = started.elapsed();
        self.metrics.set_last_latency_us(elapsed.as_micros() as u64);
        observability::record_sink_latency_ms(name, elapsed.as_secs_f64() * 1000.0);

        match result {
            Ok(()) => {
                self.metrics.inc_delivered(batch.len());
                observability::record_sink_delivery(name, true);
                info!(
                    sink = %name,
                    orders = batch.len(),
                    correlation_id = %batch.correlation_id(),
                    latency_ms = elapsed.as_millis() as u64,
                    "Successfully sent market orders"
                );
                SinkOutcome::delivered(name)
            }
            Err(e) => {
                // Skip this sink for this batch, others are unaffected
                self.metrics.inc_failure_count();
                observability::record_sink_delivery(name, false);
                error!(
                    sink = %name,
                    correlation_id = %batch.correlation_id(),
                    error = %e,
                    "Delivery failed"
                );
                SinkOutcome::failed(name, e.to_string())
            }
        }
    }
}
