//! Presence tracker
//!
//! Turns before/after status transitions into open/close session records and
//! answers "how long has this member been online" queries.
//!
//! The tracker owns the authoritative map of open sessions. The store only learns
//! about a session through the tracker, and the map is only changed once the store
//! call it mirrors has succeeded, so the two never disagree between calls.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use presence_core::{
    ActiveSession, PresenceStatus, RawStatus, SessionKey, SessionRepository, TrackedStatuses,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::error::ServiceResult;

/// What a single transition did to the member's sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// No session was opened or closed
    Unchanged,
    /// A session was opened
    Opened { status: PresenceStatus },
    /// The open session was closed and nothing replaced it
    Closed { status: PresenceStatus },
    /// The open session was closed and one for a different status opened at the
    /// same instant
    Switched {
        from: PresenceStatus,
        to: PresenceStatus,
    },
}

/// Presence session tracker
pub struct PresenceTracker {
    sessions: Arc<dyn SessionRepository>,
    tracked: TrackedStatuses,
    active: DashMap<SessionKey, ActiveSession>,
    /// One FIFO lock per key; held across store I/O so transitions for the same
    /// member never interleave. Members with nothing open lose their entry once
    /// the last holder is done.
    key_locks: DashMap<SessionKey, Arc<Mutex<()>>>,
}

impl PresenceTracker {
    /// Create a tracker over the default tracked set (online, idle, dnd)
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self::with_tracked_statuses(sessions, TrackedStatuses::default())
    }

    pub fn with_tracked_statuses(
        sessions: Arc<dyn SessionRepository>,
        tracked: TrackedStatuses,
    ) -> Self {
        Self {
            sessions,
            tracked,
            active: DashMap::new(),
            key_locks: DashMap::new(),
        }
    }

    pub fn tracked_statuses(&self) -> &TrackedStatuses {
        &self.tracked
    }

    #[inline]
    pub fn is_tracked(&self, status: PresenceStatus) -> bool {
        self.tracked.contains(status)
    }

    /// Resolve a user-supplied status filter against the tracked set.
    ///
    /// Unknown or untracked entries are dropped; if none remain, the whole tracked
    /// set is returned.
    pub fn normalize_filter<S: RawStatus>(&self, requested: &[S]) -> TrackedStatuses {
        self.tracked.narrow(requested)
    }

    /// Prepare the store and close everything a previous run left open.
    ///
    /// Must run once before any event is handled. Returns how many stale sessions
    /// were closed.
    pub async fn setup(&self) -> ServiceResult<u64> {
        self.setup_at(Utc::now()).await
    }

    /// [`setup`](Self::setup) with an explicit recovery timestamp
    #[instrument(skip(self))]
    pub async fn setup_at(&self, at: DateTime<Utc>) -> ServiceResult<u64> {
        self.sessions.initialize().await?;
        let closed = self.sessions.close_all_open(at).await?;

        // Every open row is closed now, so nothing in memory can still be open.
        self.active.clear();

        info!(closed, "Session store ready, stale sessions closed");
        Ok(closed)
    }

    /// Open a session for a member already present when the tracker joins a guild.
    ///
    /// Untracked statuses and members that already have an open session are left
    /// alone. Returns whether a session was opened.
    pub async fn bootstrap<S>(&self, key: SessionKey, status: &S) -> ServiceResult<bool>
    where
        S: RawStatus + Sync + ?Sized,
    {
        self.bootstrap_at(key, status, Utc::now()).await
    }

    /// [`bootstrap`](Self::bootstrap) with an explicit start time
    pub async fn bootstrap_at<S>(
        &self,
        key: SessionKey,
        status: &S,
        at: DateTime<Utc>,
    ) -> ServiceResult<bool>
    where
        S: RawStatus + Sync + ?Sized,
    {
        let status = PresenceStatus::normalize(status);
        if !self.is_tracked(status) {
            return Ok(false);
        }

        let lock = self.key_lock(key);
        let opened = {
            let _guard = lock.lock().await;
            if self.active.contains_key(&key) {
                debug!(%key, %status, "Bootstrap skipped, session already open");
                Ok(false)
            } else {
                self.open(key, status, at).await.map(|()| true)
            }
        };
        self.release_key_lock(key, lock);
        opened
    }

    /// Apply one observed status change, timestamped now
    pub async fn handle_transition<B, A>(
        &self,
        key: SessionKey,
        before: &B,
        after: &A,
    ) -> ServiceResult<TransitionOutcome>
    where
        B: RawStatus + Sync + ?Sized,
        A: RawStatus + Sync + ?Sized,
    {
        self.handle_transition_at(key, before, after, Utc::now())
            .await
    }

    /// Apply one observed status change at `at`.
    ///
    /// A tracked `before` moving to an untracked status, or to a tracked one other
    /// than the open session's, closes that session. A tracked `after` opens a
    /// session when none is left open, at the same instant; an untracked `before`
    /// never replaces an open session. An untracked `after` always ends with
    /// nothing open. Repeating an event changes nothing.
    pub async fn handle_transition_at<B, A>(
        &self,
        key: SessionKey,
        before: &B,
        after: &A,
        at: DateTime<Utc>,
    ) -> ServiceResult<TransitionOutcome>
    where
        B: RawStatus + Sync + ?Sized,
        A: RawStatus + Sync + ?Sized,
    {
        let before = PresenceStatus::normalize(before);
        let after = PresenceStatus::normalize(after);

        let lock = self.key_lock(key);
        let outcome = {
            let _guard = lock.lock().await;
            self.transition(key, before, after, at).await
        };
        self.release_key_lock(key, lock);
        outcome
    }

    /// Caller holds the key lock
    async fn transition(
        &self,
        key: SessionKey,
        before: PresenceStatus,
        after: PresenceStatus,
        at: DateTime<Utc>,
    ) -> ServiceResult<TransitionOutcome> {
        let before_tracked = self.is_tracked(before);
        let after_tracked = self.is_tracked(after);

        let current = self.active.get(&key).map(|entry| *entry);
        if let Some(session) = current.filter(|s| s.status != before) {
            debug!(%key, %before, open = %session.status, "Transition disagrees with open session");
        }

        let closed = match current {
            Some(session) if before_tracked && (!after_tracked || session.status != after) => {
                self.close(key, session, at).await?;
                Some(session.status)
            }
            _ => None,
        };

        if after_tracked {
            if closed.is_none() && current.is_some() {
                return Ok(TransitionOutcome::Unchanged);
            }
            self.open(key, after, at).await?;
            return Ok(match closed {
                Some(from) => TransitionOutcome::Switched { from, to: after },
                None => TransitionOutcome::Opened { status: after },
            });
        }

        match (closed, current) {
            (Some(status), _) => Ok(TransitionOutcome::Closed { status }),
            (None, Some(session)) => {
                self.close(key, session, at).await?;
                Ok(TransitionOutcome::Closed {
                    status: session.status,
                })
            }
            (None, None) => Ok(TransitionOutcome::Unchanged),
        }
    }

    /// Total tracked time for a member across all tracked statuses, up to now
    pub async fn get_total_duration(&self, key: SessionKey) -> ServiceResult<TimeDelta> {
        self.get_total_duration_at::<PresenceStatus>(key, &[], Utc::now())
            .await
    }

    /// Total time the member spent in any of `statuses`, measured up to `now`.
    ///
    /// Requested statuses that are not tracked are ignored; an empty or fully
    /// ignored filter means "all tracked statuses". Closed sessions count their
    /// full length and the open session counts up to `now`, once.
    #[instrument(skip(self, statuses))]
    pub async fn get_total_duration_at<S>(
        &self,
        key: SessionKey,
        statuses: &[S],
        now: DateTime<Utc>,
    ) -> ServiceResult<TimeDelta>
    where
        S: RawStatus + Sync,
    {
        let filter = self.normalize_filter(statuses);

        let lock = self.key_lock(key);
        let fetched = {
            let _guard = lock.lock().await;
            let active = self.active.get(&key).map(|entry| *entry);
            self.sessions
                .fetch(key, filter.as_slice())
                .await
                .map(|stored| (active, stored))
        };
        self.release_key_lock(key, lock);
        let (active, stored) = fetched?;

        let mut total = stored
            .iter()
            .filter(|session| active.is_none_or(|a| a.store_id != session.id))
            .fold(TimeDelta::zero(), |acc, session| {
                acc + session.duration_until(now)
            });

        if let Some(active) = active.filter(|a| filter.contains(a.status)) {
            total += active.elapsed(now);
        }

        Ok(total)
    }

    /// Read-only copy of the currently open sessions, ordered by key
    pub fn active_sessions(&self) -> BTreeMap<SessionKey, ActiveSession> {
        self.active
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    /// The open session for one member, if any
    pub fn active_session(&self, key: SessionKey) -> Option<ActiveSession> {
        self.active.get(&key).map(|entry| *entry)
    }

    fn key_lock(&self, key: SessionKey) -> Arc<Mutex<()>> {
        self.key_locks.entry(key).or_default().value().clone()
    }

    /// Drop the lock of a member with nothing open once no other task holds it
    fn release_key_lock(&self, key: SessionKey, lock: Arc<Mutex<()>>) {
        drop(lock);
        if !self.active.contains_key(&key) {
            self.key_locks
                .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
        }
    }

    /// Insert the store row first; the map only learns about rows that exist
    async fn open(
        &self,
        key: SessionKey,
        status: PresenceStatus,
        at: DateTime<Utc>,
    ) -> ServiceResult<()> {
        let store_id = self.sessions.insert_open(key, status, at).await?;
        self.active
            .insert(key, ActiveSession::new(store_id, at, status));

        debug!(%key, %status, session_id = %store_id, "Session opened");
        Ok(())
    }

    async fn close(
        &self,
        key: SessionKey,
        session: ActiveSession,
        at: DateTime<Utc>,
    ) -> ServiceResult<()> {
        self.sessions.close(session.store_id, at).await?;
        self.active.remove(&key);

        debug!(
            %key,
            status = %session.status,
            session_id = %session.store_id,
            "Session closed"
        );
        Ok(())
    }
}

impl std::fmt::Debug for PresenceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceTracker")
            .field("tracked", &self.tracked)
            .field("active", &self.active.len())
            .field("locks", &self.key_locks.len())
            .finish_non_exhaustive()
    }
}
