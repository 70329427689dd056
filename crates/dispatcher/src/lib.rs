//! # Dispatcher
//!
//! 数据分发模块。
//!
//! 负责：
//! - 消费 `UploadBatch`
//! - 并发 fan-out 到 pub/sub sink 与所有 HTTP sink
//! - 单个 sink 失败只记录为该 sink 的 outcome，不影响其他 sink

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{DataSink, Publisher, UploadBatch};
pub use dispatcher::{create_dispatcher, DispatchReport, Dispatcher, DispatcherBuilder};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{ingest_url, HttpSink, HttpSinkConfig, LogPublisher, PubSubSink, INGEST_PATH};
