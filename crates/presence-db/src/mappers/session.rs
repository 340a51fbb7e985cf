//! Session entity <-> model mapper

use chrono::{DateTime, Utc};
use presence_core::{PresenceStatus, Session, SessionId, SessionKey, Snowflake};

use crate::models::SessionModel;

/// Convert SessionModel to Session entity
///
/// Status labels written by older builds (or edited by hand) that are not
/// recognised read back as the fallback status rather than failing the query.
impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Session {
            id: SessionId::new(model.id),
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            status: PresenceStatus::from_label(&model.status),
            started_at: model.started_at,
            ended_at: model.ended_at,
        }
    }
}

/// Values for inserting a new open session
pub struct SessionInsert {
    pub guild_id: i64,
    pub user_id: i64,
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
}

impl SessionInsert {
    pub fn new(key: SessionKey, status: PresenceStatus, started_at: DateTime<Utc>) -> Self {
        Self {
            guild_id: key.guild_id.into_inner(),
            user_id: key.user_id.into_inner(),
            status: status.as_str(),
            started_at,
        }
    }
}
