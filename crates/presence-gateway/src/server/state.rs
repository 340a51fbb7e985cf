//! Gateway state
//!
//! Shared dependencies for the event handlers.

use crate::members::MemberStatusCache;
use presence_service::PresenceTracker;
use std::sync::Arc;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    /// Presence tracker owning the open sessions
    tracker: Arc<PresenceTracker>,
    /// Last status seen per member
    members: Arc<MemberStatusCache>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(tracker: Arc<PresenceTracker>) -> Self {
        Self {
            tracker,
            members: MemberStatusCache::new_shared(),
        }
    }

    /// Get the presence tracker
    pub fn tracker(&self) -> &PresenceTracker {
        &self.tracker
    }

    /// Get the member status cache
    pub fn members(&self) -> &MemberStatusCache {
        &self.members
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("tracker", &self.tracker)
            .field("members", &self.members.len())
            .finish()
    }
}
