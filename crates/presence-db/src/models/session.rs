//! Presence session database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the presence_sessions table
#[derive(Debug, Clone, FromRow)]
pub struct SessionModel {
    pub id: i64,
    pub guild_id: i64,
    pub user_id: i64,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}
