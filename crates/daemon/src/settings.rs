// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ambient daemon settings (§6 `app-settings.json`).
//!
//! Splits the source's single, ambiguously-reused `worker_sleep_minutes`
//! into two independent knobs per the REDESIGN FLAG in spec §9: a
//! `cycle_interval` (how often the scheduler re-queues every target) and a
//! `probe_settle` (how long the probe holds a page open after navigating,
//! §4.3 step 3). Conflating them meant a 10-minute cycle implied a
//! 10-second page settle, silently weakening the probe on shorter cycles.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use beacon_storage::write_json_atomic;

fn default_cycle_interval_secs() -> u64 {
    10 * 60
}

fn default_probe_settle_secs() -> u64 {
    5
}

fn default_control_port() -> u16 {
    crate::env::DEFAULT_CONTROL_PORT
}

fn default_headless() -> bool {
    true
}

/// Ambient daemon configuration: how often to cycle, how long a probe
/// settles, whether Chrome runs headless, and which port the control
/// protocol listens on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonSettings {
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
    #[serde(default = "default_probe_settle_secs")]
    pub probe_settle_secs: u64,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_control_port")]
    pub control_port: u16,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            cycle_interval_secs: default_cycle_interval_secs(),
            probe_settle_secs: default_probe_settle_secs(),
            headless: default_headless(),
            control_port: default_control_port(),
        }
    }
}

impl DaemonSettings {
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    pub fn probe_settle(&self) -> Duration {
        Duration::from_secs(self.probe_settle_secs)
    }

    /// Load `app-settings.json`, falling back to defaults if it is absent
    /// or unreadable (a fresh data directory has none yet).
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "app-settings.json unreadable, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        write_json_atomic(path, self)
    }
}

pub fn app_settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("app-settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_ten_minutes_and_five_seconds() {
        let settings = DaemonSettings::default();
        assert_eq!(settings.cycle_interval(), Duration::from_secs(600));
        assert_eq!(settings.probe_settle(), Duration::from_secs(5));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let settings = DaemonSettings::load(&dir.path().join("app-settings.json"));
        assert_eq!(settings, DaemonSettings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-settings.json");
        let mut settings = DaemonSettings::default();
        settings.cycle_interval_secs = 120;
        settings.headless = false;
        settings.save(&path).unwrap();

        let loaded = DaemonSettings::load(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-settings.json");
        std::fs::write(&path, b"not json").unwrap();
        assert_eq!(DaemonSettings::load(&path), DaemonSettings::default());
    }
}
