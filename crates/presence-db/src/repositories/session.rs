//! SQLite implementation of SessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};

use presence_core::traits::{RepoResult, SessionRepository};
use presence_core::{PresenceStatus, Session, SessionId, SessionKey};

use crate::mappers::SessionInsert;
use crate::models::SessionModel;

use super::error::map_db_error;

const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS presence_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        guild_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        status TEXT NOT NULL,
        started_at TEXT NOT NULL,
        ended_at TEXT
    )
";

const CREATE_LOOKUP_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_presence_sessions_lookup
    ON presence_sessions (guild_id, user_id, status)
";

const CREATE_OPEN_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_presence_sessions_open
    ON presence_sessions (guild_id, user_id, ended_at)
";

/// SQLite implementation of SessionRepository
#[derive(Clone)]
pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    /// Create a new SqliteSessionRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    #[instrument(skip(self))]
    async fn initialize(&self) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for statement in [CREATE_TABLE, CREATE_LOOKUP_INDEX, CREATE_OPEN_INDEX] {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn close_all_open(&self, at: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE presence_sessions
            SET ended_at = ?
            WHERE ended_at IS NULL
            ",
        )
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn insert_open(
        &self,
        key: SessionKey,
        status: PresenceStatus,
        started_at: DateTime<Utc>,
    ) -> RepoResult<SessionId> {
        let insert = SessionInsert::new(key, status, started_at);

        let result = sqlx::query(
            r"
            INSERT INTO presence_sessions (guild_id, user_id, status, started_at)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(insert.guild_id)
        .bind(insert.user_id)
        .bind(insert.status)
        .bind(insert.started_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        let id = SessionId::new(result.last_insert_rowid());
        debug!(session_id = %id, "Session row inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn close(&self, id: SessionId, ended_at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE presence_sessions
            SET ended_at = ?
            WHERE id = ? AND ended_at IS NULL
            ",
        )
        .bind(ended_at)
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            debug!(session_id = %id, "Session already closed or missing");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch(
        &self,
        key: SessionKey,
        statuses: &[PresenceStatus],
    ) -> RepoResult<Vec<Session>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            r"
            SELECT id, guild_id, user_id, status, started_at, ended_at
            FROM presence_sessions
            WHERE guild_id = ",
        );
        query.push_bind(key.guild_id.into_inner());
        query.push(" AND user_id = ");
        query.push_bind(key.user_id.into_inner());
        query.push(" AND status IN (");
        let mut labels = query.separated(", ");
        for status in statuses {
            labels.push_bind(status.as_str());
        }
        labels.push_unseparated(")");
        query.push(" ORDER BY started_at ASC, id ASC");

        let results = query
            .build_query_as::<SessionModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Session::from).collect())
    }
}
