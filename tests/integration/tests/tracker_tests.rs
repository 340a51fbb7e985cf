//! Tracker integration tests
//!
//! The presence tracker running against a real SQLite session store.
//!
//! Run with: cargo test -p integration-tests --test tracker_tests

use anyhow::Result;
use chrono::TimeDelta;
use integration_tests::{t0, test_store, unique_key, TestTracker};
use presence_core::{format_duration, PresenceStatus, SessionRepository, TrackedStatuses};
use std::sync::Arc;

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_online_then_idle_then_offline() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let key = unique_key();

    harness
        .tracker
        .handle_transition_at(key, "offline", "online", t0())
        .await?;
    harness
        .tracker
        .handle_transition_at(key, "online", "idle", t0() + TimeDelta::hours(2))
        .await?;
    harness
        .tracker
        .handle_transition_at(key, "idle", "offline", t0() + TimeDelta::hours(3))
        .await?;

    let stored = harness.stored(key).await?;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].status, PresenceStatus::Online);
    assert_eq!(stored[0].ended_at, Some(t0() + TimeDelta::hours(2)));
    assert_eq!(stored[1].status, PresenceStatus::Idle);
    assert_eq!(stored[1].started_at, t0() + TimeDelta::hours(2));

    let total = harness
        .tracker
        .get_total_duration_at::<&str>(key, &[], t0() + TimeDelta::days(1))
        .await?;
    assert_eq!(total, TimeDelta::hours(3));
    assert_eq!(format_duration(total), "3h");
    Ok(())
}

#[tokio::test]
async fn test_untracked_status_then_online() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let key = unique_key();

    harness
        .tracker
        .handle_transition_at(key, "offline", "streaming", t0())
        .await?;
    assert!(harness.tracker.active_session(key).is_none());
    assert!(harness.stored(key).await?.is_empty());

    harness
        .tracker
        .handle_transition_at(key, "streaming", "online", t0())
        .await?;
    harness
        .tracker
        .handle_transition_at(key, "online", "offline", t0() + TimeDelta::minutes(30))
        .await?;

    let total = harness
        .tracker
        .get_total_duration_at::<&str>(key, &[], t0() + TimeDelta::hours(2))
        .await?;
    assert_eq!(total, TimeDelta::minutes(30));
    Ok(())
}

// ============================================================================
// Recovery
// ============================================================================

#[tokio::test]
async fn test_restart_closes_stale_sessions_at_setup_time() -> Result<()> {
    let store = Arc::new(test_store().await?);
    let key = unique_key();

    let first = TestTracker::start_over(store.clone(), TrackedStatuses::default(), t0()).await?;
    first
        .tracker
        .handle_transition_at(key, "offline", "dnd", t0())
        .await?;
    drop(first);

    // The process "crashed" with the session still open.
    let setup_time = t0() + TimeDelta::minutes(75);
    let second =
        TestTracker::start_over(store, TrackedStatuses::default(), setup_time).await?;

    assert!(second.tracker.active_sessions().is_empty());
    assert!(second.open_rows(key).await?.is_empty());

    let total = second
        .tracker
        .get_total_duration_at::<&str>(key, &[], setup_time + TimeDelta::hours(8))
        .await?;
    assert_eq!(total, TimeDelta::minutes(75));
    Ok(())
}

#[tokio::test]
async fn test_setup_reports_closed_rows() -> Result<()> {
    let store = Arc::new(test_store().await?);
    store.initialize().await?;
    store
        .insert_open(unique_key(), PresenceStatus::Online, t0())
        .await?;
    store
        .insert_open(unique_key(), PresenceStatus::Idle, t0())
        .await?;

    let harness = TestTracker::start_over(store, TrackedStatuses::default(), t0()).await?;
    let again = harness.tracker.setup_at(t0() + TimeDelta::seconds(1)).await?;
    assert_eq!(again, 0);
    Ok(())
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_status_filter_covers_open_session() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let key = unique_key();

    harness
        .tracker
        .handle_transition_at(key, "offline", "online", t0())
        .await?;
    harness
        .tracker
        .handle_transition_at(key, "online", "dnd", t0() + TimeDelta::minutes(40))
        .await?;

    let now = t0() + TimeDelta::minutes(100);

    let online = harness
        .tracker
        .get_total_duration_at(key, &["online"], now)
        .await?;
    assert_eq!(online, TimeDelta::minutes(40));

    // The open dnd session exists in the store too; it must be counted once.
    let dnd = harness
        .tracker
        .get_total_duration_at(key, &["dnd"], now)
        .await?;
    assert_eq!(dnd, TimeDelta::minutes(60));

    let all = harness
        .tracker
        .get_total_duration_at::<&str>(key, &[], now)
        .await?;
    assert_eq!(all, TimeDelta::minutes(100));
    assert_eq!(format_duration(all), "1h 40m");
    Ok(())
}

#[tokio::test]
async fn test_members_are_independent() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let alice = unique_key();
    let bob = unique_key();

    harness
        .tracker
        .handle_transition_at(alice, "offline", "online", t0())
        .await?;
    harness
        .tracker
        .handle_transition_at(bob, "offline", "idle", t0() + TimeDelta::minutes(10))
        .await?;
    harness
        .tracker
        .handle_transition_at(alice, "online", "offline", t0() + TimeDelta::minutes(20))
        .await?;

    let now = t0() + TimeDelta::minutes(30);
    assert_eq!(
        harness
            .tracker
            .get_total_duration_at::<&str>(alice, &[], now)
            .await?,
        TimeDelta::minutes(20)
    );
    assert_eq!(
        harness
            .tracker
            .get_total_duration_at::<&str>(bob, &[], now)
            .await?,
        TimeDelta::minutes(20)
    );

    let active = harness.tracker.active_sessions();
    assert_eq!(active.len(), 1);
    assert!(active.contains_key(&bob));
    Ok(())
}

// ============================================================================
// Invariants
// ============================================================================

#[tokio::test]
async fn test_one_open_row_after_arbitrary_transitions() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let key = unique_key();
    let statuses = ["online", "idle", "dnd", "offline", "invisible", "do_not_disturb"];

    let mut at = t0();
    for (i, before) in statuses.iter().enumerate() {
        for after in statuses.iter().cycle().skip(i).take(statuses.len()) {
            at += TimeDelta::seconds(30);
            harness
                .tracker
                .handle_transition_at(key, *before, *after, at)
                .await?;

            let open = harness.open_rows(key).await?;
            assert!(open.len() <= 1);
            assert_eq!(
                open.first().map(|s| s.id),
                harness.tracker.active_session(key).map(|a| a.store_id)
            );
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_repeated_transition_adds_no_rows() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let key = unique_key();

    for minute in 0..5 {
        harness
            .tracker
            .handle_transition_at(key, "idle", "idle", t0() + TimeDelta::minutes(minute))
            .await?;
    }

    let stored = harness.stored(key).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].started_at, t0());
    Ok(())
}

#[tokio::test]
async fn test_only_online_tracked() -> Result<()> {
    let tracked = TrackedStatuses::parse_list("online")?;
    let harness = TestTracker::start_with(tracked, t0()).await?;
    let key = unique_key();

    assert!(!harness.tracker.bootstrap_at(key, "idle", t0()).await?);
    harness
        .tracker
        .handle_transition_at(key, "idle", "online", t0())
        .await?;
    harness
        .tracker
        .handle_transition_at(key, "online", "dnd", t0() + TimeDelta::minutes(5))
        .await?;

    // "dnd" is not a valid filter here, so the query covers every tracked status.
    let total = harness
        .tracker
        .get_total_duration_at(key, &["dnd"], t0() + TimeDelta::hours(1))
        .await?;
    assert_eq!(total, TimeDelta::minutes(5));
    Ok(())
}
