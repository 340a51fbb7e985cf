//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Session, SessionId, SessionKey};
use crate::error::DomainError;
use crate::value_objects::PresenceStatus;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Session Repository
// ============================================================================

/// Durable table of presence sessions.
///
/// The store does not enforce "one open session per key"; the tracker does.
/// Every mutation is committed before the call returns, and any I/O failure is
/// reported as [`DomainError::StoreUnavailable`].
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create the schema if it does not exist yet. Safe to call on every start.
    async fn initialize(&self) -> RepoResult<()>;

    /// Stamp `ended_at` on every open session, whatever its key. Returns how many
    /// sessions were closed.
    async fn close_all_open(&self, at: DateTime<Utc>) -> RepoResult<u64>;

    /// Insert a new open session and return its id
    async fn insert_open(
        &self,
        key: SessionKey,
        status: PresenceStatus,
        started_at: DateTime<Utc>,
    ) -> RepoResult<SessionId>;

    /// Close one session. Closing an already closed session leaves it unchanged.
    async fn close(&self, id: SessionId, ended_at: DateTime<Utc>) -> RepoResult<()>;

    /// All sessions for the key whose status is in `statuses`, open or closed,
    /// ordered by `started_at` ascending
    async fn fetch(&self, key: SessionKey, statuses: &[PresenceStatus])
        -> RepoResult<Vec<Session>>;
}
