//! Sink implementations
//!
//! Contains HttpSink, PubSubSink and LogPublisher.

mod http;
mod log;
mod pubsub;

pub use self::http::{ingest_url, HttpSink, HttpSinkConfig, INGEST_PATH};
pub use self::log::LogPublisher;
pub use self::pubsub::PubSubSink;
