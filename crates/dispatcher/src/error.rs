//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// Only sink construction can fail; delivery failures are reported per sink
/// in the `DispatchReport` instead.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// More than one pub/sub sink configured
    #[error("sink '{name}': a pub/sub sink is already configured")]
    DuplicatePubSub { name: String },
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
