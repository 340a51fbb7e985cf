//! # presence-core
//!
//! Domain layer for presence session tracking: identifiers, canonical statuses,
//! session entities, the session store port, and duration formatting.
//! This crate has zero dependencies on infrastructure (database, gateway, etc.).

pub mod entities;
pub mod error;
pub mod format;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ActiveSession, Session, SessionId, SessionKey};
pub use error::DomainError;
pub use format::format_duration;
pub use traits::{RepoResult, SessionRepository};
pub use value_objects::{
    PresenceStatus, RawStatus, Snowflake, SnowflakeParseError, TrackedStatuses,
    TrackedStatusesError,
};
