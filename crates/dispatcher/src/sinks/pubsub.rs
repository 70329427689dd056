//! PubSubSink - hand batches to a pub/sub publisher

use contracts::{ContractError, DataSink, Publisher, UploadBatch};
use tracing::instrument;

/// Sink that publishes each batch on a topic
pub struct PubSubSink<P> {
    name: String,
    topic: String,
    publisher: P,
}

impl<P: Publisher> PubSubSink<P> {
    /// Create a new PubSubSink
    pub fn new(name: impl Into<String>, topic: impl Into<String>, publisher: P) -> Self {
        Self {
            name: name.into(),
            topic: topic.into(),
            publisher,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

impl<P: Publisher + Sync> DataSink for PubSubSink<P> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "pub_sub_sink_deliver",
        skip(self, batch),
        fields(sink = %self.name, topic = %self.topic, orders = batch.len())
    )]
    async fn deliver(&self, batch: &UploadBatch) -> Result<(), ContractError> {
        let correlation_id = batch.correlation_id();
        self.publisher
            .publish(&self.topic, batch, &correlation_id)
            .await
    }
}
