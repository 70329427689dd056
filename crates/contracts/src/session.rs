//! Per-session player state
//!
//! Owned by the caller and lent to the offers handler for each event.

/// Player session state read and updated by the offers handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current location id (empty until the first zone transition)
    pub location_id: String,

    /// Set on offers request, cleared on offers response
    pub waiting_for_market_data: bool,
}

impl SessionState {
    /// Create a session already placed at `location_id`
    pub fn at(location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            waiting_for_market_data: false,
        }
    }

    /// Whether the current location can be attached to orders
    pub fn is_valid_location(&self) -> bool {
        !self.location_id.trim().is_empty()
    }
}
