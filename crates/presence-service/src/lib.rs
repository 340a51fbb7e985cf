//! # presence-service
//!
//! Application layer: the presence tracker that turns status transitions into
//! durable sessions and answers duration queries.

pub mod services;

pub use services::{PresenceTracker, ServiceError, ServiceResult, TransitionOutcome};
