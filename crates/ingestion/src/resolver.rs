//! Location resolver

use contracts::Order;

/// Fill an empty order location from the session
///
/// Non-empty locations (including dual-location ids) are left alone. An empty
/// `session_location` leaves the order empty; it is still forwarded.
pub fn resolve(mut order: Order, session_location: &str) -> Order {
    if order.location_id.is_empty() {
        order.location_id = session_location.to_string();
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_at(location: &str) -> Order {
        Order {
            location_id: location.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_location_takes_session() {
        assert_eq!(resolve(order_at(""), "3005").location_id, "3005");
    }

    #[test]
    fn test_existing_location_untouched() {
        assert_eq!(resolve(order_at("0007@1000"), "3005").location_id, "0007@1000");
        assert_eq!(resolve(order_at("4002"), "3005").location_id, "4002");
    }

    #[test]
    fn test_unknown_session_location() {
        assert_eq!(resolve(order_at(""), "").location_id, "");
    }
}
