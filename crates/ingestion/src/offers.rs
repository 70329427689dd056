//! Auction offers operation handling
//!
//! Drives the normalizer, resolver and assembler from decoded marketplace
//! events, against the caller's `SessionState`.

use contracts::{MarketEvent, OffersRequest, OffersResponse, SessionState, UploadBatch};
use tracing::{debug, info, instrument, warn};

use crate::assembler::assemble;
use crate::error::RejectedRecord;
use crate::normalizer::normalize_all;
use crate::resolver::resolve;

/// What handling one event produced
#[derive(Debug)]
pub enum EventOutcome {
    /// Offers request seen; now waiting for the response
    Requested,
    /// Session location changed
    LocationUpdated,
    /// Response discarded: the player location is unknown
    InvalidLocation,
    /// Response held no usable orders
    Empty { rejected: Vec<RejectedRecord> },
    /// Batch ready for dispatch
    Batch {
        batch: UploadBatch,
        rejected: Vec<RejectedRecord>,
    },
}

impl EventOutcome {
    /// The assembled batch, if any
    pub fn into_batch(self) -> Option<UploadBatch> {
        match self {
            Self::Batch { batch, .. } => Some(batch),
            _ => None,
        }
    }

    /// Records dropped while handling the event
    pub fn rejected(&self) -> &[RejectedRecord] {
        match self {
            Self::Empty { rejected } | Self::Batch { rejected, .. } => rejected.as_slice(),
            _ => &[],
        }
    }
}

/// Handle one decoded marketplace event
pub fn handle_event(session: &mut SessionState, event: &MarketEvent) -> EventOutcome {
    match event {
        MarketEvent::OffersRequest(request) => on_offers_request(session, request),
        MarketEvent::OffersResponse(response) => on_offers_response(session, response),
        MarketEvent::LocationChanged { location_id } => {
            debug!(from = %session.location_id, to = %location_id, "Location changed");
            session.location_id = location_id.clone();
            EventOutcome::LocationUpdated
        }
    }
}

/// Offers request: mark the session as waiting for market data
pub fn on_offers_request(session: &mut SessionState, request: &OffersRequest) -> EventOutcome {
    debug!(
        category = %request.category,
        sub_category = %request.sub_category,
        items = request.item_ids.len(),
        max_results = request.max_results,
        "Got AuctionGetOffers operation"
    );
    session.waiting_for_market_data = true;
    EventOutcome::Requested
}

/// Offers response: normalize, resolve and assemble the orders
#[instrument(
    name = "offers_response",
    skip(session, response),
    fields(records = response.market_orders.len())
)]
pub fn on_offers_response(session: &mut SessionState, response: &OffersResponse) -> EventOutcome {
    debug!("Got response to AuctionGetOffers operation");
    session.waiting_for_market_data = false;

    if !session.is_valid_location() {
        warn!(
            "The player location has not been set yet, transition zones so it can be identified"
        );
        return EventOutcome::InvalidLocation;
    }

    let (orders, rejected) = normalize_all(response.market_orders.as_slice());
    let orders = orders
        .into_iter()
        .map(|order| resolve(order, &session.location_id))
        .collect();

    match assemble(orders) {
        Some(batch) => {
            info!(
                orders = batch.len(),
                correlation_id = %batch.correlation_id(),
                "Sending live market orders to ingest"
            );
            EventOutcome::Batch { batch, rejected }
        }
        None => EventOutcome::Empty { rejected },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(orders: &[&str]) -> MarketEvent {
        MarketEvent::OffersResponse(OffersResponse {
            market_orders: orders.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_request_then_response_toggles_waiting() {
        let mut session = SessionState::at("3005");

        let outcome = handle_event(
            &mut session,
            &MarketEvent::OffersRequest(OffersRequest::default()),
        );
        assert!(matches!(outcome, EventOutcome::Requested));
        assert!(session.waiting_for_market_data);

        handle_event(&mut session, &response(&[]));
        assert!(!session.waiting_for_market_data);
    }

    #[test]
    fn test_example_scenario() {
        let mut session = SessionState::at("3005");
        let outcome = handle_event(
            &mut session,
            &response(&[
                r#"{"LocationId":"0007@1000","ItemTypeId":"T4_BAG"}"#,
                r#"{"LocationId":"","ItemTypeId":"T5_SWORD"}"#,
            ]),
        );

        let batch = outcome.into_batch().expect("batch");
        let locations: Vec<_> = batch.orders().iter().map(|o| o.location_id.as_str()).collect();
        assert_eq!(locations, ["0007@1000", "3005"]);
    }

    #[test]
    fn test_zero_records_no_batch() {
        let mut session = SessionState::at("3005");
        let outcome = handle_event(&mut session, &response(&[]));
        assert!(matches!(outcome, EventOutcome::Empty { .. }));
        assert!(outcome.rejected().is_empty());
    }

    #[test]
    fn test_all_records_rejected_no_batch() {
        let mut session = SessionState::at("3005");
        let outcome = handle_event(&mut session, &response(&["nope", "[]"]));
        assert!(matches!(outcome, EventOutcome::Empty { .. }));
        assert_eq!(outcome.rejected().len(), 2);
    }

    #[test]
    fn test_invalid_location_discards_response() {
        let mut session = SessionState {
            location_id: String::new(),
            waiting_for_market_data: true,
        };

        let outcome = handle_event(
            &mut session,
            &response(&[r#"{"LocationId":"0007@1000","ItemTypeId":"T4_BAG"}"#]),
        );
        assert!(matches!(outcome, EventOutcome::InvalidLocation));
        assert!(!session.waiting_for_market_data);
    }

    #[test]
    fn test_location_change_applies_to_next_response() {
        let mut session = SessionState::default();
        handle_event(
            &mut session,
            &MarketEvent::LocationChanged {
                location_id: "4002".into(),
            },
        );
        let batch = handle_event(&mut session, &response(&[r#"{"LocationId":""}"#]))
            .into_batch()
            .unwrap();
        assert_eq!(batch.orders()[0].location_id, "4002");
    }
}
