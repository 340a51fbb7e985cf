//! Session entities - intervals a member spent in a tracked status

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{PresenceStatus, Snowflake};

/// Store-assigned session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(i64);

impl SessionId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A member within a guild; sessions are tracked independently per key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
}

impl SessionKey {
    #[inline]
    pub const fn new(guild_id: Snowflake, user_id: Snowflake) -> Self {
        Self { guild_id, user_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.guild_id, self.user_id)
    }
}

/// Durable session record
///
/// `ended_at` is `None` exactly while the session is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub status: PresenceStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    #[inline]
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.guild_id, self.user_id)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Length of the session, measuring open sessions up to `now`
    pub fn duration_until(&self, now: DateTime<Utc>) -> TimeDelta {
        self.ended_at.unwrap_or(now) - self.started_at
    }
}

/// In-memory view of a session that has not been closed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveSession {
    /// Row in the session store backing this session
    pub store_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub status: PresenceStatus,
}

impl ActiveSession {
    pub fn new(store_id: SessionId, started_at: DateTime<Utc>, status: PresenceStatus) -> Self {
        Self {
            store_id,
            started_at,
            status,
        }
    }

    /// Time elapsed since the session opened
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.started_at
    }
}
