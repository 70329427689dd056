//! Order data model
//!
//! `RawRecord` (as decoded from the wire) -> `Order` -> `UploadBatch`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// JSON field carrying the location of a raw order
pub const LOCATION_FIELD: &str = "LocationId";

/// Raw marketplace record, first decode stage
///
/// The location field is pulled out into `raw_location` so it can be
/// repaired before the full order is decoded. Every other field stays in
/// `payload` untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    /// Location as found on the wire (absent => `Null`)
    #[serde(rename = "LocationId", default)]
    pub raw_location: Value,

    /// Remaining fields, opaque at this stage
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl RawRecord {
    /// Parse one raw payload; anything but a JSON object is rejected
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Location as a string; absent or non-string values read as empty
    pub fn location(&self) -> &str {
        self.raw_location.as_str().unwrap_or_default()
    }

    /// Second decode stage: write back the canonical location and decode the order
    pub fn into_order(mut self, location: String) -> Result<Order, serde_json::Error> {
        self.payload
            .insert(LOCATION_FIELD.to_string(), Value::String(location));
        serde_json::from_value(Value::Object(self.payload))
    }
}

/// Normalized marketplace order
///
/// Known fields are typed; anything else the game sends is carried through
/// verbatim in `extra` so sinks see the full record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Order {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub item_type_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub item_group_type_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quality_level: u8,
    #[serde(deserialize_with = "null_as_default")]
    pub enchantment_level: u8,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_price_silver: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub auction_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expires: String,

    /// Unrecognized fields, passed through
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `null` reads as the field's zero value, like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Per-batch trace identifier
///
/// UUIDv7: millisecond timestamp plus random bits. Used to correlate log
/// lines across sinks, never as a dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Mint a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One upload: every order from a single offers response
///
/// Never empty. Serializes as `{"Orders":[...]}`; the correlation id stays
/// local to logging and is not part of the payload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadBatch {
    #[serde(rename = "Orders")]
    orders: Vec<Order>,

    #[serde(skip)]
    correlation_id: CorrelationId,
}

impl UploadBatch {
    /// Build a batch, `None` when there are no orders
    pub fn new(orders: Vec<Order>, correlation_id: CorrelationId) -> Option<Self> {
        if orders.is_empty() {
            return None;
        }
        Some(Self {
            orders,
            correlation_id,
        })
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// JSON body sent to ingest endpoints
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
