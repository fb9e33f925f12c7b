// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded interaction sequences (§3, §4.1, §4.5).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::action::Action;

/// Unique, immutable snapshot identifier.
///
/// Generated from a nanosecond epoch timestamp made monotonic process-wide
/// by an atomic counter tiebreaker, per §4.5 ("monotonic process-wide, e.g.
/// nanosecond timestamp"). Opaque to everything except the snapshot store,
/// which uses it verbatim as a filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(SmolStr);

static LAST_NANOS: AtomicU64 = AtomicU64::new(0);

impl SnapshotId {
    /// Generate a new identifier from the current time.
    ///
    /// Ties (two calls within the same nanosecond, or a clock that moved
    /// backward) are broken by bumping the last-issued value by one so IDs
    /// stay unique and increasing within a process.
    pub fn generate() -> Self {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos() as u64;
        let nanos = LAST_NANOS
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or(now);
        Self(SmolStr::new(nanos.to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        Self(SmolStr::new(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The alert-log key for this snapshot's replay failures (§3, §4.9).
    pub fn alert_key(&self) -> String {
        format!("snapshot_{}", self.0)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SnapshotId {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for SnapshotId {
    fn from(s: String) -> Self {
        Self(SmolStr::new(s))
    }
}

/// A recorded, frozen sequence of browser interactions starting at a URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub starting_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub actions: Vec<Action>,
}

impl Snapshot {
    pub fn new(starting_url: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            id: SnapshotId::generate(),
            starting_url: starting_url.into(),
            name: None,
            created_at: Utc::now(),
            actions,
        }
    }
}
