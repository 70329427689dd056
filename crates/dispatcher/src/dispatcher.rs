//! Dispatcher - fan-out of one batch to every configured sink

use futures_util::future::{join, join_all};
use tracing::{debug, info, instrument, warn};

use contracts::{
    CorrelationId, DataSink, Publisher, SinkOutcome, SinkTarget, UploadBatch, UploaderConfig,
};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{HttpSink, HttpSinkConfig, LogPublisher, PubSubSink};

/// Outcome of dispatching one batch
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub correlation_id: CorrelationId,
    /// Pub/sub first (if configured), then HTTP sinks in configuration order
    pub outcomes: Vec<SinkOutcome>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }

    pub fn all_delivered(&self) -> bool {
        self.outcomes.iter().all(SinkOutcome::is_delivered)
    }

    /// Outcome for a sink by name
    pub fn outcome(&self, sink: &str) -> Option<&SinkOutcome> {
        self.outcomes.iter().find(|o| o.sink == sink)
    }
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder<P = LogPublisher> {
    pub_sub: Option<SinkHandle<PubSubSink<P>>>,
    http: Vec<SinkHandle<HttpSink>>,
}

impl<P> Default for DispatcherBuilder<P> {
    fn default() -> Self {
        Self {
            pub_sub: None,
            http: Vec::new(),
        }
    }
}

impl<P: Publisher + Sync> DispatcherBuilder<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pub/sub sink
    ///
    /// # Errors
    /// `DuplicatePubSub` if one is already set
    pub fn with_pub_sub(mut self, sink: PubSubSink<P>) -> Result<Self, DispatcherError> {
        if self.pub_sub.is_some() {
            return Err(DispatcherError::DuplicatePubSub {
                name: sink.name().to_string(),
            });
        }
        self.pub_sub = Some(SinkHandle::new(sink));
        Ok(self)
    }

    /// Append an HTTP sink
    pub fn with_http(mut self, sink: HttpSink) -> Self {
        self.http.push(SinkHandle::new(sink));
        self
    }

    pub fn build(self) -> Dispatcher<P> {
        Dispatcher {
            pub_sub: self.pub_sub,
            http: self.http,
        }
    }
}

/// Delivers each batch to the pub/sub sink and every HTTP sink
///
/// Deliveries run concurrently. A failing sink only shows up as a failed
/// outcome in the report.
pub struct Dispatcher<P = LogPublisher> {
    pub_sub: Option<SinkHandle<PubSubSink<P>>>,
    http: Vec<SinkHandle<HttpSink>>,
}

impl<P: Publisher + Sync> Dispatcher<P> {
    /// Total configured sinks
    pub fn sink_count(&self) -> usize {
        self.http.len() + usize::from(self.pub_sub.is_some())
    }

    /// Sink names, in dispatch order
    pub fn sink_names(&self) -> Vec<&str> {
        self.pub_sub
            .iter()
            .map(SinkHandle::name)
            .chain(self.http.iter().map(SinkHandle::name))
            .collect()
    }

    /// The pub/sub sink, if configured
    pub fn pub_sub(&self) -> Option<&PubSubSink<P>> {
        self.pub_sub.as_ref().map(SinkHandle::sink)
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        let pub_sub = self
            .pub_sub
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()));
        let http = self
            .http
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()));
        pub_sub.chain(http).collect()
    }

    /// Deliver one batch to all sinks
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, batch),
        fields(orders = batch.len(), correlation_id = %batch.correlation_id())
    )]
    pub async fn dispatch(&self, batch: &UploadBatch) -> DispatchReport {
        let pub_sub = async {
            match &self.pub_sub {
                Some(handle) => Some(handle.deliver(batch).await),
                None => None,
            }
        };
        let http = join_all(self.http.iter().map(|h| h.deliver(batch)));

        let (pub_sub, http) = join(pub_sub, http).await;
        let outcomes: Vec<SinkOutcome> = pub_sub.into_iter().chain(http).collect();

        let report = DispatchReport {
            correlation_id: batch.correlation_id(),
            outcomes,
        };

        if report.outcomes.is_empty() {
            debug!("No sinks configured, batch dropped");
        } else if report.all_delivered() {
            debug!(sinks = report.outcomes.len(), "Batch dispatched");
        } else {
            warn!(
                delivered = report.delivered(),
                failed = report.failed(),
                "Batch dispatched with failures"
            );
        }
        report
    }
}

/// Create a dispatcher from the sink routing table
///
/// `publisher` backs the pub/sub sink; it is dropped if none is configured.
#[instrument(
    name = "dispatcher_create",
    skip(config, publisher),
    fields(sink_count = config.sinks.len())
)]
pub fn create_dispatcher<P: Publisher + Sync>(
    config: &UploaderConfig,
    publisher: P,
) -> Result<Dispatcher<P>, DispatcherError> {
    let mut publisher = Some(publisher);
    let mut builder = DispatcherBuilder::new();

    for sink_config in &config.sinks {
        match &sink_config.target {
            SinkTarget::PubSub { topic } => {
                let publisher = publisher.take().ok_or_else(|| DispatcherError::DuplicatePubSub {
                    name: sink_config.name.clone(),
                })?;
                builder = builder.with_pub_sub(PubSubSink::new(&sink_config.name, topic, publisher))?;
            }
            target @ SinkTarget::Http { .. } => {
                let http_config = HttpSinkConfig::from_target(target)
                    .ok_or_else(|| DispatcherError::sink_creation(&sink_config.name, "not an HTTP target"))?;
                builder = builder.with_http(HttpSink::new(&sink_config.name, http_config)?);
            }
        }
    }

    let dispatcher = builder.build();
    info!(sinks = ?dispatcher.sink_names(), "Dispatcher ready");
    Ok(dispatcher)
}
