//! UploaderConfig - Config Loader output
//!
//! Describes the session seed and the sink routing table.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Well-known ingest topic for market orders
pub const DEFAULT_INGEST_TOPIC: &str = "marketorders.ingest";

/// Per-request timeout for HTTP sinks (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Complete uploader configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UploaderConfig {
    /// Session seed
    #[serde(default)]
    pub session: SessionConfig,

    /// Output routing
    #[serde(default)]
    #[validate(nested)]
    pub sinks: Vec<SinkConfig>,
}

/// Session seed, used until the first zone transition is observed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Initial player location id
    #[serde(default)]
    pub location_id: Option<String>,
}

/// One configured sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SinkConfig {
    /// Sink name (logging / metrics)
    #[validate(length(min = 1, message = "sink name cannot be empty"))]
    pub name: String,

    /// Destination
    #[serde(flatten)]
    pub target: SinkTarget,
}

/// Sink destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkTarget {
    /// Pub/sub ingest topic
    PubSub {
        #[serde(default = "default_topic")]
        topic: String,
    },
    /// HTTP ingest endpoint (base URL)
    Http {
        url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_topic() -> String {
    DEFAULT_INGEST_TOPIC.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl SinkTarget {
    /// Pub/sub sink on the default topic
    pub fn pub_sub() -> Self {
        Self::PubSub {
            topic: default_topic(),
        }
    }

    /// HTTP sink with the default timeout
    pub fn http(url: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    pub fn is_pub_sub(&self) -> bool {
        matches!(self, Self::PubSub { .. })
    }
}

impl UploaderConfig {
    /// The pub/sub sink, if one is configured
    pub fn pub_sub_sink(&self) -> Option<&SinkConfig> {
        self.sinks.iter().find(|s| s.target.is_pub_sub())
    }

    /// All HTTP sinks, in configuration order
    pub fn http_sinks(&self) -> impl Iterator<Item = &SinkConfig> {
        self.sinks.iter().filter(|s| !s.target.is_pub_sub())
    }
}
