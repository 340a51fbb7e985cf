//! Event handlers
//!
//! Routes dispatch events to the handler for their type.

mod error;
mod guild;
mod presence;

pub use error::{HandlerError, HandlerResult};
pub use guild::{BootstrapSummary, GuildHandler};
pub use presence::PresenceHandler;

use crate::events::GatewayEventType;
use crate::protocol::DispatchMessage;
use crate::server::GatewayState;
use presence_service::TransitionOutcome;

/// What a dispatched event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// READY or GUILD_CREATE snapshot applied
    Bootstrapped(BootstrapSummary),
    /// GUILD_DELETE applied; number of cached statuses dropped
    GuildRemoved(usize),
    /// PRESENCE_UPDATE applied
    Transition(TransitionOutcome),
    /// Event type the tracker does not handle
    Ignored,
}

/// Dispatch incoming gateway events to the appropriate handlers
pub struct EventDispatcher;

impl EventDispatcher {
    /// Handle one dispatch message
    pub async fn dispatch(
        state: &GatewayState,
        message: &DispatchMessage,
    ) -> HandlerResult<Dispatched> {
        let Some(event_type) = message.event_type() else {
            tracing::debug!(event = %message.t, "Ignoring unhandled event type");
            return Ok(Dispatched::Ignored);
        };

        let event = event_type.as_str();
        match event_type {
            GatewayEventType::Ready => {
                let payload = message
                    .payload()
                    .map_err(|e| HandlerError::invalid_payload(event, e))?;
                GuildHandler::handle_ready(state, payload)
                    .await
                    .map(Dispatched::Bootstrapped)
            }
            GatewayEventType::GuildCreate => {
                let payload = message
                    .payload()
                    .map_err(|e| HandlerError::invalid_payload(event, e))?;
                GuildHandler::handle_create(state, payload)
                    .await
                    .map(Dispatched::Bootstrapped)
            }
            GatewayEventType::GuildDelete => {
                let payload = message
                    .payload()
                    .map_err(|e| HandlerError::invalid_payload(event, e))?;
                Ok(Dispatched::GuildRemoved(GuildHandler::handle_delete(
                    state, payload,
                )))
            }
            GatewayEventType::PresenceUpdate => {
                let payload = message
                    .payload()
                    .map_err(|e| HandlerError::invalid_payload(event, e))?;
                PresenceHandler::handle(state, payload)
                    .await
                    .map(Dispatched::Transition)
            }
        }
    }
}
