// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The crash-restartable state file (§3, §4.9, §6 `daemon-state.json`):
//! lifecycle state, configuration, and aggregate counters, written
//! write-temp-then-rename on every transition.

use std::path::{Path, PathBuf};

use beacon_core::{Configuration, DaemonState};
use beacon_storage::write_json_atomic;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Aggregate counters that survive process restarts (§3: "the state, the
/// configuration, the snapshot-identifier map, and aggregate counters are
/// persisted to a single state file on every transition"). Per-target
/// statistics are *not* in this list — §3 says those live only for the
/// process lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateCounters {
    pub total_checks: u64,
    pub total_failures: u64,
    pub cycles_completed: u64,
    pub last_cycle_started: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedState {
    pub state: DaemonState,
    pub config: Configuration,
    pub aggregate: AggregateCounters,
    pub last_saved_unix: u64,
}

impl PersistedState {
    /// Load the state file, or a fresh `Stopped`/empty-config default if it
    /// is absent or unreadable (a corrupt state file is a `PersistenceFailure`
    /// §7, not a startup abort — the daemon starts `Stopped` with empty
    /// configuration and waits for `SET_CONFIG`).
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "daemon-state.json unreadable, starting fresh");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        write_json_atomic(path, self)
    }

    /// On process start, a persisted `Running`/`Paused` is demoted to
    /// `Stopped` (§4.9: "monitoring never auto-resumes across restarts").
    pub fn demote_on_restart(mut self) -> Self {
        self.state = self.state.demote_on_restart();
        self
    }
}

pub fn daemon_state_path(data_dir: &Path) -> PathBuf {
    data_dir.join("daemon-state.json")
}
