//! Record normalizer
//!
//! Turns one raw order payload into an `Order`, repairing the location
//! encoding on the way.

use contracts::{Order, RawRecord};
use tracing::{debug, warn};

use crate::error::{RejectedRecord, Result};

/// Location encodings seen on the wire
///
/// Closed set: a new family needs a new variant here and an arm in
/// [`canonical_location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFamily {
    /// Two sub-locations joined by `@` (rests, smugglers dens).
    /// The value is the final location id.
    DualLocation,
    /// Regular city market. Empty means "the city the player is in".
    StandardCity,
}

impl LocationFamily {
    /// Separator used by the dual-location encoding
    pub const SEPARATOR: char = '@';

    /// Classify a raw location value
    pub fn classify(location: &str) -> Self {
        if location.contains(Self::SEPARATOR) {
            Self::DualLocation
        } else {
            Self::StandardCity
        }
    }
}

/// Canonical form of a raw location value
pub fn canonical_location(location: &str) -> &str {
    match LocationFamily::classify(location) {
        LocationFamily::DualLocation => location,
        // empty is resolved later from session state
        LocationFamily::StandardCity => location,
    }
}

/// Decode one raw order payload
///
/// # Errors
/// `IngestionError::Decode` when the payload is not a JSON object or a known
/// field has the wrong shape. A missing or non-string `LocationId` is not an
/// error; it reads as empty.
pub fn normalize(raw: &str) -> Result<Order> {
    let record = RawRecord::from_json(raw)?;
    let location = canonical_location(record.location()).to_string();
    Ok(record.into_order(location)?)
}

/// Decode every payload of a response, keeping the good ones
///
/// Rejected payloads are logged and returned alongside; they never abort
/// the rest of the response.
pub fn normalize_all<S: AsRef<str>>(raws: &[S]) -> (Vec<Order>, Vec<RejectedRecord>) {
    let mut orders = Vec::with_capacity(raws.len());
    let mut rejected = Vec::new();

    for (index, raw) in raws.iter().enumerate() {
        match normalize(raw.as_ref()) {
            Ok(order) => orders.push(order),
            Err(error) => {
                warn!(index, error = %error, "Dropping market order that failed to decode");
                observability::record_record_rejected();
                rejected.push(RejectedRecord { index, error });
            }
        }
    }

    observability::record_orders_normalized(orders.len());
    debug!(
        normalized = orders.len(),
        rejected = rejected.len(),
        "Normalized market orders"
    );

    (orders, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            LocationFamily::classify("0007@1000"),
            LocationFamily::DualLocation
        );
        assert_eq!(LocationFamily::classify("@"), LocationFamily::DualLocation);
        assert_eq!(LocationFamily::classify("3005"), LocationFamily::StandardCity);
        assert_eq!(LocationFamily::classify(""), LocationFamily::StandardCity);
    }

    #[test]
    fn test_dual_location_preserved() {
        for location in ["0007@1000", "@", "4002@BLACKBANK-2311", "a@b@c"] {
            let raw = format!(r#"{{"LocationId":"{location}","ItemTypeId":"T4_BAG"}}"#);
            let order = normalize(&raw).unwrap();
            assert_eq!(order.location_id, location);
        }
    }

    #[test]
    fn test_standard_city_passes_through() {
        let order = normalize(r#"{"LocationId":"","ItemTypeId":"T5_SWORD"}"#).unwrap();
        assert_eq!(order.location_id, "");

        let order = normalize(r#"{"LocationId":"3005","ItemTypeId":"T5_SWORD"}"#).unwrap();
        assert_eq!(order.location_id, "3005");
    }

    #[test]
    fn test_missing_or_non_string_location_is_empty() {
        let order = normalize(r#"{"ItemTypeId":"T5_SWORD"}"#).unwrap();
        assert_eq!(order.location_id, "");

        let order = normalize(r#"{"LocationId":1002,"ItemTypeId":"T5_SWORD"}"#).unwrap();
        assert_eq!(order.location_id, "");
    }

    #[test]
    fn test_null_fields_read_as_zero_values() {
        let order =
            normalize(r#"{"LocationId":"","ItemTypeId":"T4_BAG","Expires":null}"#).unwrap();
        assert_eq!(order.item_type_id, "T4_BAG");
        assert_eq!(order.expires, "");

        let order = normalize(
            r#"{"Id":null,"ItemTypeId":null,"QualityLevel":null,"UnitPriceSilver":null,"LocationId":"0007@1000"}"#,
        )
        .unwrap();
        assert_eq!(order.id, 0);
        assert_eq!(order.item_type_id, "");
        assert_eq!(order.quality_level, 0);
        assert_eq!(order.unit_price_silver, 0);
        assert_eq!(order.location_id, "0007@1000");
    }

    #[test]
    fn test_decode_errors() {
        assert!(normalize("not json").is_err());
        assert!(normalize("[]").is_err());
        // wrong shape on a typed field
        assert!(normalize(r#"{"LocationId":"","Amount":"lots"}"#).is_err());
    }

    #[test]
    fn test_normalize_all_keeps_going_after_bad_record() {
        let raws = [
            r#"{"LocationId":"0007@1000","ItemTypeId":"T4_BAG"}"#,
            "{broken",
            r#"{"LocationId":"","ItemTypeId":"T5_SWORD"}"#,
        ];
        let (orders, rejected) = normalize_all(&raws);

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].item_type_id, "T4_BAG");
        assert_eq!(orders[1].item_type_id, "T5_SWORD");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].index, 1);
    }

    #[test]
    fn test_normalize_all_empty() {
        let raws: [&str; 0] = [];
        let (orders, rejected) = normalize_all(&raws);
        assert!(orders.is_empty());
        assert!(rejected.is_empty());
    }
}
