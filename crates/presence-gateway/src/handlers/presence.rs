//! PRESENCE_UPDATE handler

use super::HandlerResult;
use crate::events::PresenceUpdateEvent;
use crate::server::GatewayState;
use presence_core::PresenceStatus;
use presence_service::TransitionOutcome;

/// Handles presence updates
pub struct PresenceHandler;

impl PresenceHandler {
    /// Feed one status change into the tracker.
    ///
    /// The previous status comes from the event when present, otherwise from the
    /// member cache. The cache is updated with the new status even if the tracker
    /// call fails; it only reflects what the gateway reported.
    pub async fn handle(
        state: &GatewayState,
        payload: PresenceUpdateEvent,
    ) -> HandlerResult<TransitionOutcome> {
        let key = payload.key();
        let after = PresenceStatus::normalize(&payload.status);
        let before = match &payload.before_status {
            Some(raw) => PresenceStatus::normalize(raw),
            None => state.members().previous_or_fallback(key),
        };
        state.members().record(key, after);

        let outcome = state
            .tracker()
            .handle_transition(key, &before, &after)
            .await?;

        match outcome {
            TransitionOutcome::Unchanged => {
                tracing::trace!(%key, %before, %after, "Presence update without session change");
            }
            _ => {
                tracing::debug!(%key, %before, %after, ?outcome, "Presence update applied");
            }
        }

        Ok(outcome)
    }
}
