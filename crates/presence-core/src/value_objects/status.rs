//! Presence statuses and the set of statuses that count toward session time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical presence status.
///
/// Every raw status observed on the gateway collapses into one of these four
/// labels. `Offline` doubles as the fallback for anything unrecognised, including a
/// missing status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// Member is online and active
    Online,
    /// Member is idle (away from keyboard)
    Idle,
    /// Do not disturb
    Dnd,
    /// Offline, invisible, or unknown
    #[default]
    Offline,
}

impl PresenceStatus {
    /// Label used for any status that is not recognised
    pub const FALLBACK: Self = Self::Offline;

    /// Canonical lowercase label, as persisted in the session store
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Dnd => "dnd",
            Self::Offline => "offline",
        }
    }

    /// Normalize anything status-like into a canonical status. Never fails.
    pub fn normalize<S: RawStatus + ?Sized>(raw: &S) -> Self {
        raw.raw_status().map_or(Self::FALLBACK, Self::from_label)
    }

    /// Map a free-form label onto the canonical set, falling back to `Offline`.
    pub fn from_label(label: &str) -> Self {
        Self::recognise(label).unwrap_or(Self::FALLBACK)
    }

    /// Whether this status can ever be part of a tracked set
    #[must_use]
    pub const fn is_trackable(self) -> bool {
        !matches!(self, Self::Offline)
    }

    fn recognise(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "online" => Some(Self::Online),
            "idle" => Some(Self::Idle),
            "dnd" | "do_not_disturb" | "do-not-disturb" | "donotdisturb" => Some(Self::Dnd),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = TrackedStatusesError;

    /// Strict parse, for configuration. Use [`PresenceStatus::normalize`] for
    /// gateway input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::recognise(s).ok_or_else(|| TrackedStatusesError::Unknown(s.trim().to_string()))
    }
}

/// Anything that may carry a raw status string.
///
/// Gateway clients hand statuses over as plain strings, optional strings, or
/// already-parsed values; all of them normalize through the same path.
pub trait RawStatus {
    /// The raw label, or `None` when no status data is available
    fn raw_status(&self) -> Option<&str>;
}

impl RawStatus for str {
    fn raw_status(&self) -> Option<&str> {
        Some(self)
    }
}

impl RawStatus for String {
    fn raw_status(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl RawStatus for PresenceStatus {
    fn raw_status(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: RawStatus> RawStatus for Option<T> {
    fn raw_status(&self) -> Option<&str> {
        self.as_ref().and_then(RawStatus::raw_status)
    }
}

impl<T: RawStatus + ?Sized> RawStatus for &T {
    fn raw_status(&self) -> Option<&str> {
        (**self).raw_status()
    }
}

/// Errors building a tracked status set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackedStatusesError {
    #[error("unknown status: {0}")]
    Unknown(String),

    #[error("status cannot be tracked: {0}")]
    Untrackable(PresenceStatus),

    #[error("tracked status set is empty")]
    Empty,
}

/// Ordered, de-duplicated set of statuses that count toward session time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedStatuses(Vec<PresenceStatus>);

impl Default for TrackedStatuses {
    fn default() -> Self {
        Self(vec![
            PresenceStatus::Online,
            PresenceStatus::Idle,
            PresenceStatus::Dnd,
        ])
    }
}

impl TrackedStatuses {
    /// Build a set from explicit statuses, keeping first-seen order
    pub fn new<I>(statuses: I) -> Result<Self, TrackedStatusesError>
    where
        I: IntoIterator<Item = PresenceStatus>,
    {
        let mut set = Vec::new();
        for status in statuses {
            if !status.is_trackable() {
                return Err(TrackedStatusesError::Untrackable(status));
            }
            if !set.contains(&status) {
                set.push(status);
            }
        }

        if set.is_empty() {
            return Err(TrackedStatusesError::Empty);
        }
        Ok(Self(set))
    }

    /// Parse a comma separated list such as `"online,idle,dnd"`
    pub fn parse_list(list: &str) -> Result<Self, TrackedStatusesError> {
        let statuses = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<PresenceStatus>, _>>()?;
        Self::new(statuses)
    }

    #[inline]
    pub fn contains(&self, status: PresenceStatus) -> bool {
        self.0.contains(&status)
    }

    #[inline]
    pub fn as_slice(&self) -> &[PresenceStatus] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = PresenceStatus> + '_ {
        self.0.iter().copied()
    }

    /// Restrict this set to the requested statuses.
    ///
    /// Requested values are normalized and anything outside this set is dropped.
    /// If nothing survives, the full set is returned rather than an error.
    pub fn narrow<I>(&self, requested: I) -> Self
    where
        I: IntoIterator,
        I::Item: RawStatus,
    {
        let mut narrowed = Vec::new();
        for raw in requested {
            let status = PresenceStatus::normalize(&raw);
            if self.contains(status) && !narrowed.contains(&status) {
                narrowed.push(status);
            }
        }

        if narrowed.is_empty() {
            self.clone()
        } else {
            Self(narrowed)
        }
    }
}
