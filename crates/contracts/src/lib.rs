//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the uploader.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data flow
//! - `MarketEvent` comes in from the protocol decoding layer
//! - each raw payload becomes an `Order`
//! - orders are grouped into one `UploadBatch` tagged with a `CorrelationId`
//! - the batch is handed to every `DataSink`

mod config;
mod error;
mod event;
mod order;
mod session;
mod sink;

pub use config::*;
pub use error::*;
pub use event::*;
pub use order::*;
pub use session::SessionState;
pub use sink::*;
