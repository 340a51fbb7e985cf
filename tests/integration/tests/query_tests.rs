//! Query command tests
//!
//! A second process reading totals from the store a running gateway writes to.
//!
//! Run with: cargo test -p integration-tests --test query_tests

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{TimeDelta, Utc};
use integration_tests::{unique_id, unique_key, TestTracker};
use presence_common::AppConfig;
use presence_core::{PresenceStatus, TrackedStatuses};
use presence_db::{create_pool, DatabaseConfig, SqliteSessionRepository};
use presence_gateway::server::query_total;

/// Store file shared by the "gateway" and the query, removed on drop
struct SharedDb {
    path: PathBuf,
    config: AppConfig,
}

impl SharedDb {
    fn new() -> Result<Self> {
        let path = std::env::temp_dir().join(format!(
            "presence-query-{}-{}.db",
            std::process::id(),
            unique_id()
        ));
        let url = format!("sqlite://{}", path.display());
        let config = AppConfig::from_lookup(|key| (key == "DATABASE_URL").then(|| url.clone()))?;
        Ok(Self { path, config })
    }

    async fn store(&self) -> Result<Arc<SqliteSessionRepository>> {
        let pool = create_pool(&DatabaseConfig::from(&self.config.database)).await?;
        Ok(Arc::new(SqliteSessionRepository::new(pool)))
    }
}

impl Drop for SharedDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[tokio::test]
async fn test_query_counts_live_session_without_closing_it() -> Result<()> {
    let db = SharedDb::new()?;
    let key = unique_key();
    let now = Utc::now();

    let start = now - TimeDelta::hours(3);
    let gateway = TestTracker::start_over(db.store().await?, TrackedStatuses::default(), start).await?;
    gateway
        .tracker
        .handle_transition_at(key, "offline", "idle", start)
        .await?;
    gateway
        .tracker
        .handle_transition_at(key, "idle", "online", now - TimeDelta::hours(2))
        .await?;

    let idle = query_total(&db.config, key, &["idle".to_string()]).await?;
    assert_eq!(idle, TimeDelta::hours(1));

    let online = query_total(&db.config, key, &["online".to_string()]).await?;
    assert!(online >= TimeDelta::hours(2));
    assert!(online < TimeDelta::hours(2) + TimeDelta::minutes(1));

    let all = query_total(&db.config, key, &[]).await?;
    assert!(all >= TimeDelta::hours(3));

    // The gateway's session is still open and still its own.
    let open = gateway.open_rows(key).await?;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].status, PresenceStatus::Online);
    assert_eq!(
        gateway.tracker.active_session(key).map(|s| s.store_id),
        Some(open[0].id)
    );
    Ok(())
}

#[tokio::test]
async fn test_query_on_fresh_store_is_zero() -> Result<()> {
    let db = SharedDb::new()?;

    let total = query_total(&db.config, unique_key(), &["dnd".to_string()]).await?;
    assert_eq!(total, TimeDelta::zero());
    Ok(())
}
