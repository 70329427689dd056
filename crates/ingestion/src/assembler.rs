//! Batch assembler

use contracts::{CorrelationId, Order, UploadBatch};
use tracing::debug;

/// Group orders into one upload batch
///
/// Returns `None` for an empty set; no correlation id is minted in that case.
pub fn assemble(orders: Vec<Order>) -> Option<UploadBatch> {
    if orders.is_empty() {
        debug!("No orders to upload");
        return None;
    }

    let batch = UploadBatch::new(orders, CorrelationId::new())?;
    observability::record_batch_assembled(batch.len());
    Some(batch)
}
