//! MarketEvent - protocol decoding layer output
//!
//! Decoded marketplace operations, one per captured request/response.

use serde::{Deserialize, Serialize};

/// Decoded marketplace event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// Client asked the auction house for offers
    OffersRequest(OffersRequest),

    /// Auction house answered with raw orders
    OffersResponse(OffersResponse),

    /// Player changed zone
    LocationChanged { location_id: String },
}

/// Parameters of an offers query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffersRequest {
    pub category: String,
    pub sub_category: String,
    pub quality: String,
    pub enchantment: u32,
    pub enchantment_level: String,
    pub item_ids: Vec<u16>,
    pub max_results: u32,
    pub is_ascending_order: bool,
}

/// Offers response, one JSON object string per order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffersResponse {
    #[serde(default)]
    pub market_orders: Vec<String>,
}
