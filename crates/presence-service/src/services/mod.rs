//! Business logic services

pub mod error;
pub mod tracker;

pub use error::{ServiceError, ServiceResult};
pub use tracker::{PresenceTracker, TransitionOutcome};
