//! Dispatch message format
//!
//! Every event on the feed is one JSON object: `{"t": EVENT_NAME, "d": payload}`,
//! optionally with the gateway sequence number `s`.

use crate::events::GatewayEventType;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dispatch envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchMessage {
    /// Event name
    pub t: String,

    /// Sequence number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(default)]
    pub d: Value,
}

impl DispatchMessage {
    /// Create a dispatch message for a known event type
    #[must_use]
    pub fn new(event_type: GatewayEventType, data: Value) -> Self {
        Self {
            t: event_type.as_str().to_string(),
            s: None,
            d: data,
        }
    }

    /// Decode one line of the feed
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// The event type, or `None` for events the tracker does not handle
    pub fn event_type(&self) -> Option<GatewayEventType> {
        GatewayEventType::from_name(&self.t)
    }

    /// Decode the payload into an event struct
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.d)
    }
}
