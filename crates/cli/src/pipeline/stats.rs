//! Replay statistics.

use std::time::Duration;

use observability::UploadMetricsAggregator;

/// Statistics from a replay run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Events read from the input
    pub events_read: u64,

    /// Offers responses among them
    pub responses: u64,

    /// Total duration of the run
    pub duration: Duration,

    /// Number of configured sinks
    pub active_sinks: usize,

    /// Location the session ended at
    pub final_location: String,

    /// Upload metrics aggregator
    pub upload_metrics: UploadMetricsAggregator,
}

impl PipelineStats {
    /// Events handled per second
    pub fn events_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.events_read as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Replay Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Events read: {}", self.events_read);
        println!("   ├─ Offers responses: {}", self.responses);
        println!("   ├─ Events/s: {:.2}", self.events_per_sec());
        println!("   ├─ Active sinks: {}", self.active_sinks);
        let location = if self.final_location.is_empty() {
            "(unknown)"
        } else {
            self.final_location.as_str()
        };
        println!("   └─ Final location: {}", location);

        let summary = self.upload_metrics.summary();

        println!("\n📈 Upload Metrics");
        println!("   ├─ Batches: {}", summary.total_batches);
        println!("   ├─ Orders uploaded: {}", summary.total_orders);
        println!("   ├─ Records rejected: {}", summary.total_rejected);
        println!("   ├─ Responses discarded: {}", summary.responses_discarded);
        println!("   ├─ Batch size: {}", summary.batch_size);
        println!(
            "   └─ Delivery failure rate: {:.2}%",
            summary.delivery_failure_rate
        );

        if !summary.sink_successes.is_empty() || !summary.sink_failures.is_empty() {
            println!("\n📤 Sinks (ok/failed)");
            let names: std::collections::BTreeSet<_> = summary
                .sink_successes
                .keys()
                .chain(summary.sink_failures.keys())
                .collect();
            for name in names {
                println!(
                    "   ├─ {}: {}/{}",
                    name,
                    summary.sink_successes.get(name).copied().unwrap_or(0),
                    summary.sink_failures.get(name).copied().unwrap_or(0)
                );
            }
        }

        println!();
    }
}
