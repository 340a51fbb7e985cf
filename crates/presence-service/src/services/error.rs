//! Service layer error types

use presence_common::AppError;
use presence_core::DomainError;
use std::fmt;

/// Service layer error type
///
/// The tracker never retries; store failures surface here unchanged so the caller
/// (the gateway event handler) can log and drop the event.
#[derive(Debug)]
pub enum ServiceError {
    /// Domain or store failure
    Domain(DomainError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
        }
    }
}

impl ServiceError {
    /// Get the error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if the session store was unreachable
    pub fn is_store_unavailable(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_store_unavailable(),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
