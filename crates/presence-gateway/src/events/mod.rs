//! Gateway events
//!
//! Defines the dispatch events the tracker listens to.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{
    GuildCreateEvent, GuildDeleteEvent, MemberPresence, PresenceUpdateEvent, ReadyEvent,
    UserIdPayload,
};
