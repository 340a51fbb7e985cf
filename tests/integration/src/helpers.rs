//! Test helpers for integration tests
//!
//! Every harness gets its own private in-memory SQLite database, so tests can run
//! in parallel without any external services.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use presence_core::{PresenceStatus, Session, SessionKey, SessionRepository, TrackedStatuses};
use presence_db::{create_pool, DatabaseConfig, SqliteSessionRepository};
use presence_gateway::protocol::DispatchMessage;
use presence_gateway::server::{run_feed, FeedStats, GatewayState};
use presence_service::PresenceTracker;

/// Tracker wired to a fresh SQLite store
pub struct TestTracker {
    pub store: Arc<SqliteSessionRepository>,
    pub tracker: Arc<PresenceTracker>,
}

impl TestTracker {
    /// Start a tracker over the default tracked statuses, set up at `at`
    pub async fn start_at(at: DateTime<Utc>) -> Result<Self> {
        Self::start_with(TrackedStatuses::default(), at).await
    }

    /// Start a tracker with a custom tracked set
    pub async fn start_with(tracked: TrackedStatuses, at: DateTime<Utc>) -> Result<Self> {
        let store = Arc::new(test_store().await?);
        Self::start_over(store, tracked, at).await
    }

    /// Start a tracker over an existing store, as a restarted process would
    pub async fn start_over(
        store: Arc<SqliteSessionRepository>,
        tracked: TrackedStatuses,
        at: DateTime<Utc>,
    ) -> Result<Self> {
        let tracker = PresenceTracker::with_tracked_statuses(store.clone(), tracked);
        tracker.setup_at(at).await?;
        Ok(Self {
            store,
            tracker: Arc::new(tracker),
        })
    }

    /// All stored sessions for a key, across every status
    pub async fn stored(&self, key: SessionKey) -> Result<Vec<Session>> {
        let all = [
            PresenceStatus::Online,
            PresenceStatus::Idle,
            PresenceStatus::Dnd,
        ];
        Ok(self.store.fetch(key, &all).await?)
    }

    /// Stored sessions for a key that are still open
    pub async fn open_rows(&self, key: SessionKey) -> Result<Vec<Session>> {
        Ok(self
            .stored(key)
            .await?
            .into_iter()
            .filter(Session::is_open)
            .collect())
    }

    /// Gateway state sharing this tracker
    pub fn gateway(&self) -> GatewayState {
        GatewayState::new(Arc::clone(&self.tracker))
    }
}

/// Fresh, uninitialized in-memory store
pub async fn test_store() -> Result<SqliteSessionRepository> {
    let pool = create_pool(&DatabaseConfig::in_memory()).await?;
    Ok(SqliteSessionRepository::new(pool))
}

/// Run dispatch messages through the feed as NDJSON
pub async fn feed(state: &GatewayState, messages: &[DispatchMessage]) -> Result<FeedStats> {
    let mut ndjson = String::new();
    for message in messages {
        ndjson.push_str(&serde_json::to_string(message)?);
        ndjson.push('\n');
    }
    Ok(run_feed(state, ndjson.as_bytes()).await?)
}
