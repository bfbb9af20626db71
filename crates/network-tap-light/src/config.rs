//! Configuration types for the network tap.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Responses whose request URL contains this substring are inspected
    pub path_filter: String,
    /// Listing-history entry fields tried, in order, for the correlating identifier
    pub identifier_fields: Vec<String>,
    /// Capacity of the observation broadcast channel
    pub event_buffer: usize,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            path_filter: "/core".to_string(),
            identifier_fields: vec![
                "listing_id".to_string(),
                "listingId".to_string(),
                "id".to_string(),
            ],
            event_buffer: 64,
        }
    }
}
