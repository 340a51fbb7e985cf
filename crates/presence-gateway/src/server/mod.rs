//! Gateway runtime
//!
//! Wires the store and tracker together, drives the event feed and answers
//! one-off duration queries.

mod feed;
mod state;

pub use feed::{run_feed, FeedStats};
pub use state::GatewayState;

use chrono::{TimeDelta, Utc};
use presence_common::{AppConfig, AppError};
use presence_core::{format_duration, SessionKey, SessionRepository};
use presence_db::{create_pool, DatabaseConfig, SqliteSessionRepository};
use presence_service::PresenceTracker;
use std::sync::Arc;
use tokio::io::BufReader;

async fn open_store(config: &AppConfig) -> Result<Arc<SqliteSessionRepository>, AppError> {
    tracing::info!(url = %config.database.url, "Opening session store...");
    let db_config = DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config).await.map_err(AppError::database)?;
    tracing::info!("Session store connection established");

    Ok(Arc::new(SqliteSessionRepository::new(pool)))
}

/// Initialize all dependencies and create `GatewayState`.
///
/// Stale sessions from a previous run are closed before this returns.
pub async fn create_gateway_state(config: &AppConfig) -> Result<GatewayState, AppError> {
    let repository = open_store(config).await?;
    let tracker = PresenceTracker::with_tracked_statuses(
        repository,
        config.tracker.tracked_statuses.clone(),
    );
    tracker.setup().await?;

    Ok(GatewayState::new(Arc::new(tracker)))
}

/// Total tracked time for one member, measured up to now.
///
/// Safe to run next to a live gateway on the same store: open sessions are
/// counted up to now and left open. An empty `statuses` means every tracked
/// status.
pub async fn query_total(
    config: &AppConfig,
    key: SessionKey,
    statuses: &[String],
) -> Result<TimeDelta, AppError> {
    let repository = open_store(config).await?;
    repository.initialize().await?;

    let tracker = PresenceTracker::with_tracked_statuses(
        repository,
        config.tracker.tracked_statuses.clone(),
    );
    let total = tracker
        .get_total_duration_at(key, statuses, Utc::now())
        .await?;

    tracing::info!(%key, statuses = ?statuses, total = %format_duration(total), "Total computed");
    Ok(total)
}

/// Log the sessions still open, with how long each has been running
pub fn log_active_sessions(state: &GatewayState) {
    let now = Utc::now();
    let active = state.tracker().active_sessions();

    for (key, session) in &active {
        tracing::info!(
            %key,
            status = %session.status,
            since = %session.started_at.to_rfc3339(),
            elapsed = %format_duration(session.elapsed(now)),
            "Session still open"
        );
    }
    tracing::info!(open = active.len(), "Active sessions at shutdown");
}

/// Run the gateway adapter over stdin until the feed ends or Ctrl+C
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = create_gateway_state(&config).await?;
    tracing::info!(
        tracked = ?config.tracker.tracked_statuses.as_slice(),
        "Reading gateway events from stdin"
    );

    let reader = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = run_feed(&state, reader) => {
            let stats = result?;
            tracing::info!(
                events = stats.events,
                applied = stats.applied,
                ignored = stats.ignored,
                dropped = stats.dropped,
                "Event feed closed"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    log_active_sessions(&state);
    Ok(())
}
