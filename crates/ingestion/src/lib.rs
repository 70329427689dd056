//! # Ingestion
//!
//! Market order ingestion module.
//!
//! Responsibilities:
//! - Decode raw order payloads into `Order` (repairing the location encoding)
//! - Fill missing locations from session state
//! - Assemble one `UploadBatch` per offers response
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::SessionState;
//! use ingestion::handle_event;
//!
//! let mut session = SessionState::at("3005");
//! if let Some(batch) = handle_event(&mut session, &event).into_batch() {
//!     dispatcher.dispatch(&batch).await;
//! }
//! ```

mod assembler;
mod error;
mod normalizer;
mod offers;
mod resolver;

// Re-exports
pub use assembler::assemble;
pub use error::{IngestionError, RejectedRecord, Result};
pub use normalizer::{canonical_location, normalize, normalize_all, LocationFamily};
pub use offers::{handle_event, on_offers_request, on_offers_response, EventOutcome};
pub use resolver::resolve;
