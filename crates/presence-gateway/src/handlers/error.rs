//! Handler error types

use presence_service::ServiceError;
use thiserror::Error;

/// Handler error type
///
/// Every variant means "drop this event": the feed logs it and moves on.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Payload did not match the event's shape
    #[error("Invalid payload for {event}: {source}")]
    InvalidPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Tracker or store failure
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl HandlerError {
    pub fn invalid_payload(event: &'static str, source: serde_json::Error) -> Self {
        Self::InvalidPayload { event, source }
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPayload { .. } => "INVALID_PAYLOAD",
            Self::Service(e) => e.error_code(),
        }
    }

    /// Store failures are logged louder than bad input
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::Service(e) if e.is_store_unavailable())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
