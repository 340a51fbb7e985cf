//! Gateway event types
//!
//! The dispatch events the tracker consumes. Anything else on the feed is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gateway event types
///
/// These are the event names sent in the `t` field of dispatch messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEventType {
    /// Initial state after connecting, with every guild and its members
    Ready,
    /// Guild available or joined
    GuildCreate,
    /// Left guild, kicked, or guild deleted
    GuildDelete,
    /// Member status changed
    PresenceUpdate,
}

impl GatewayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::GuildCreate => "GUILD_CREATE",
            Self::GuildDelete => "GUILD_DELETE",
            Self::PresenceUpdate => "PRESENCE_UPDATE",
        }
    }

    /// Look up an event type by its wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "READY" => Some(Self::Ready),
            "GUILD_CREATE" => Some(Self::GuildCreate),
            "GUILD_DELETE" => Some(Self::GuildDelete),
            "PRESENCE_UPDATE" => Some(Self::PresenceUpdate),
            _ => None,
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
