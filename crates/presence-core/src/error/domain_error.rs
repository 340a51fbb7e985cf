//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
///
/// Unknown or malformed statuses are never errors; they normalize to
/// [`PresenceStatus::FALLBACK`](crate::PresenceStatus::FALLBACK).
#[derive(Debug, Error)]
pub enum DomainError {
    /// The session store could not complete an operation (I/O, lock, corrupt file)
    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    /// Wrap any store-side failure
    pub fn store_unavailable(err: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(err.to_string())
    }

    /// Get an error code string for logs and replies
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Check if the store was unreachable
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
