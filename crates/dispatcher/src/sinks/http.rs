//! HttpSink - POST batches to an HTTP ingest endpoint

use std::time::Duration;

use contracts::{
    ContractError, DataSink, SinkTarget, UploadBatch, DEFAULT_HTTP_TIMEOUT_SECS,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::DispatcherError;

/// Path segment every ingest endpoint ends with
pub const INGEST_PATH: &str = "/ingest";

/// Normalize a base URL to its ingest endpoint
///
/// `http://h/base`, `http://h/base/` and `http://h/base/ingest` all map to
/// `http://h/base/ingest`. Idempotent.
pub fn ingest_url(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with(INGEST_PATH) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{INGEST_PATH}")
    }
}

/// Configuration for HttpSink
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Base URL as configured
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl HttpSinkConfig {
    /// Config with the default timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    /// Create config from a sink target
    pub fn from_target(target: &SinkTarget) -> Option<Self> {
        match target {
            SinkTarget::Http { url, timeout_secs } => Some(Self {
                url: url.clone(),
                timeout: Duration::from_secs(*timeout_secs),
            }),
            SinkTarget::PubSub { .. } => None,
        }
    }
}

/// Sink that POSTs each batch as JSON, once, without retry
pub struct HttpSink {
    name: String,
    endpoint: String,
    client: Client,
}

impl HttpSink {
    /// Create a new HttpSink
    pub fn new(name: impl Into<String>, config: HttpSinkConfig) -> Result<Self, DispatcherError> {
        let name = name.into();
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DispatcherError::sink_creation(&name, e.to_string()))?;
        let endpoint = ingest_url(&config.url);

        debug!(
            sink = %name,
            endpoint = %endpoint,
            timeout_ms = config.timeout.as_millis() as u64,
            "HttpSink created"
        );

        Ok(Self {
            name,
            endpoint,
            client,
        })
    }

    /// Normalized endpoint this sink posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl DataSink for HttpSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_sink_deliver",
        skip(self, batch),
        fields(sink = %self.name, endpoint = %self.endpoint, orders = batch.len())
    )]
    async fn deliver(&self, batch: &UploadBatch) -> Result<(), ContractError> {
        let body = batch.to_json()?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ContractError::sink_connection(&self.name, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Ingest endpoint accepted batch");
            Ok(())
        } else {
            Err(ContractError::sink_delivery(
                &self.name,
                format!("{} returned status {}", self.endpoint, status.as_u16()),
            ))
        }
    }
}
