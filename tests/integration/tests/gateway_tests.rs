//! Gateway Integration Tests
//!
//! Dispatch events fed through the NDJSON feed into a tracker backed by SQLite.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use anyhow::Result;
use integration_tests::{
    feed, guild_create, guild_delete, presence_change, presence_update, t0, unique_id,
    unique_key, TestTracker,
};
use presence_core::{PresenceStatus, SessionKey, Snowflake};
use presence_gateway::protocol::DispatchMessage;

#[tokio::test]
async fn test_guild_snapshot_bootstraps_tracked_members() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let state = harness.gateway();
    let guild = Snowflake::new(unique_id());
    let (online, idle, offline) = (
        Snowflake::new(unique_id()),
        Snowflake::new(unique_id()),
        Snowflake::new(unique_id()),
    );

    let stats = feed(
        &state,
        &[guild_create(
            guild,
            &[(online, "online"), (idle, "IDLE"), (offline, "offline")],
        )],
    )
    .await?;
    assert_eq!(stats.applied, 1);

    let active = harness.tracker.active_sessions();
    assert_eq!(active.len(), 2);
    assert_eq!(
        active[&SessionKey::new(guild, idle)].status,
        PresenceStatus::Idle
    );
    assert!(!active.contains_key(&SessionKey::new(guild, offline)));

    // A second snapshot of the same guild opens nothing new.
    feed(&state, &[guild_create(guild, &[(online, "dnd")])]).await?;
    assert_eq!(harness.open_rows(SessionKey::new(guild, online)).await?.len(), 1);
    assert_eq!(
        harness
            .tracker
            .active_session(SessionKey::new(guild, online))
            .map(|s| s.status),
        Some(PresenceStatus::Online)
    );
    Ok(())
}

#[tokio::test]
async fn test_presence_updates_open_and_close_sessions() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let state = harness.gateway();
    let key = unique_key();

    feed(
        &state,
        &[
            presence_update(key, "online"),
            presence_update(key, "idle"),
            presence_update(key, "offline"),
        ],
    )
    .await?;

    let stored = harness.stored(key).await?;
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|s| !s.is_open()));
    assert_eq!(stored[0].status, PresenceStatus::Online);
    assert_eq!(stored[1].status, PresenceStatus::Idle);
    assert!(harness.tracker.active_sessions().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_stale_untracked_before_keeps_session() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let state = harness.gateway();
    let key = unique_key();

    feed(
        &state,
        &[
            presence_change(key, "offline", "online"),
            // The online -> idle update was never delivered.
            presence_change(key, "offline", "dnd"),
        ],
    )
    .await?;

    let open = harness.open_rows(key).await?;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].status, PresenceStatus::Online);
    assert_eq!(harness.stored(key).await?.len(), 1);
    assert_eq!(
        harness.tracker.active_session(key).map(|s| s.status),
        Some(PresenceStatus::Online)
    );
    Ok(())
}

#[tokio::test]
async fn test_guild_delete_keeps_sessions() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let state = harness.gateway();
    let guild = Snowflake::new(unique_id());
    let user = Snowflake::new(unique_id());
    let key = SessionKey::new(guild, user);

    feed(
        &state,
        &[guild_create(guild, &[(user, "online")]), guild_delete(guild)],
    )
    .await?;

    assert!(state.members().last_status(key).is_none());
    assert!(harness.tracker.active_session(key).is_some());

    // With the cache gone the next update falls back to "offline" as before.
    feed(&state, &[presence_update(key, "offline")]).await?;
    assert!(harness.open_rows(key).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_bad_events_are_dropped() -> Result<()> {
    let harness = TestTracker::start_at(t0()).await?;
    let state = harness.gateway();
    let key = unique_key();

    let unknown = DispatchMessage::from_line(r#"{"t":"MESSAGE_CREATE","d":{"content":"hi"}}"#)?;
    let malformed = DispatchMessage::from_line(r#"{"t":"PRESENCE_UPDATE","d":{"status":"online"}}"#)?;

    let stats = feed(&state, &[unknown, malformed, presence_update(key, "online")]).await?;
    assert_eq!(stats.events, 3);
    assert_eq!(stats.ignored, 1);
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.applied, 1);
    assert!(harness.tracker.active_session(key).is_some());
    Ok(())
}
