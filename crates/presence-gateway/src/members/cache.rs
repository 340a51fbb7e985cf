//! Last-seen member statuses
//!
//! Uses DashMap so the cache can be shared between handlers without a lock.

use dashmap::DashMap;
use presence_core::{PresenceStatus, SessionKey, Snowflake};
use std::sync::Arc;

/// Last observed status per guild member
#[derive(Debug, Default)]
pub struct MemberStatusCache {
    statuses: DashMap<SessionKey, PresenceStatus>,
}

impl MemberStatusCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new cache wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Record a member's latest status, returning the one it replaces
    pub fn record(&self, key: SessionKey, status: PresenceStatus) -> Option<PresenceStatus> {
        self.statuses.insert(key, status)
    }

    /// Last status seen for a member
    pub fn last_status(&self, key: SessionKey) -> Option<PresenceStatus> {
        self.statuses.get(&key).map(|entry| *entry)
    }

    /// Status to use as "before" when the event does not carry one
    pub fn previous_or_fallback(&self, key: SessionKey) -> PresenceStatus {
        self.last_status(key).unwrap_or(PresenceStatus::FALLBACK)
    }

    /// Drop every member of a guild, returning how many entries were removed
    pub fn forget_guild(&self, guild_id: Snowflake) -> usize {
        let before = self.statuses.len();
        self.statuses.retain(|key, _| key.guild_id != guild_id);
        let removed = before.saturating_sub(self.statuses.len());

        tracing::debug!(guild_id = %guild_id, removed, "Guild member statuses dropped");
        removed
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
