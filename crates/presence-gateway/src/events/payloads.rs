//! Event payload definitions
//!
//! Only the fields the tracker needs are modelled; everything else the gateway
//! sends is ignored during deserialization.

use presence_core::{SessionKey, Snowflake};
use serde::{Deserialize, Serialize};

/// User reference inside member and presence payloads
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserIdPayload {
    pub id: Snowflake,
}

/// READY event payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Guilds the tracker is in, with their member snapshots
    #[serde(default)]
    pub guilds: Vec<GuildCreateEvent>,
}

/// GUILD_CREATE event payload
///
/// Sent for each guild on connect, or when joining a new guild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildCreateEvent {
    pub id: Snowflake,
    #[serde(default)]
    pub members: Vec<MemberPresence>,
}

/// One member's status in a guild snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPresence {
    pub user: UserIdPayload,
    /// Raw status label; absent when the gateway has no presence data
    #[serde(default)]
    pub status: Option<String>,
}

/// GUILD_DELETE event payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GuildDeleteEvent {
    pub id: Snowflake,
    /// If true, this is a temporary outage; if false, the tracker left the guild
    #[serde(default)]
    pub unavailable: bool,
}

/// PRESENCE_UPDATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUpdateEvent {
    pub guild_id: Snowflake,
    pub user: UserIdPayload,
    #[serde(default)]
    pub status: Option<String>,
    /// Status before the change, when the gateway knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_status: Option<String>,
}

impl PresenceUpdateEvent {
    #[must_use]
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.guild_id, self.user.id)
    }
}
