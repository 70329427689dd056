//! DataSink / Publisher traits - Dispatcher output interface
//!
//! Defines the abstract interface for sinks and the pub/sub collaborator.

use std::fmt;

use crate::{ContractError, CorrelationId, UploadBatch};

/// Data output trait
///
/// All sink implementations must implement this trait. Sinks only ever see
/// a shared borrow of the batch.
#[trait_variant::make(DataSink: Send)]
pub trait LocalDataSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one batch
    ///
    /// # Errors
    /// Returns delivery error (should include context)
    async fn deliver(&self, batch: &UploadBatch) -> Result<(), ContractError>;
}

/// Pub/sub client collaborator
///
/// Retry and acknowledgement semantics belong to the implementation; the
/// dispatcher treats a call as a single fire.
#[trait_variant::make(Publisher: Send)]
pub trait LocalPublisher {
    async fn publish(
        &self,
        topic: &str,
        batch: &UploadBatch,
        correlation_id: &CorrelationId,
    ) -> Result<(), ContractError>;
}

/// Result of delivering one batch to one sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Failed(String),
}

/// Tagged per-sink outcome collected by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOutcome {
    pub sink: String,
    pub status: DeliveryStatus,
}

impl SinkOutcome {
    pub fn delivered(sink: impl Into<String>) -> Self {
        Self {
            sink: sink.into(),
            status: DeliveryStatus::Delivered,
        }
    }

    pub fn failed(sink: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            sink: sink.into(),
            status: DeliveryStatus::Failed(reason.into()),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered)
    }
}

impl fmt::Display for SinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            DeliveryStatus::Delivered => write!(f, "{}: delivered", self.sink),
            DeliveryStatus::Failed(reason) => write!(f, "{}: failed ({})", self.sink, reason),
        }
    }
}
