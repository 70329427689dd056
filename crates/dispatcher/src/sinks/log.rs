//! LogPublisher - publishes batch summaries via tracing

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{ContractError, CorrelationId, Publisher, UploadBatch};
use tracing::info;

/// Publisher that logs what would be published
///
/// Stands in for a broker client when none is wired up.
#[derive(Debug, Default)]
pub struct LogPublisher {
    published: AtomicU64,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches published so far
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Publisher for LogPublisher {
    async fn publish(
        &self,
        topic: &str,
        batch: &UploadBatch,
        correlation_id: &CorrelationId,
    ) -> Result<(), ContractError> {
        let payload = batch.to_json()?;
        self.published.fetch_add(1, Ordering::Relaxed);

        info!(
            topic = %topic,
            orders = batch.len(),
            bytes = payload.len(),
            correlation_id = %correlation_id,
            "Published market orders"
        );
        Ok(())
    }
}
