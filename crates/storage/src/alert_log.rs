// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alert throttling log (§4.2): one on-disk map of alert key → last-sent
//! unix timestamp, guarded by a process-wide lock so concurrent workers
//! never both win the same throttle check.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use beacon_core::AlertKey;
use parking_lot::Mutex;
use tracing::warn;

use crate::atomic::write_json_atomic;

pub const DEFAULT_MIN_GAP_SECS: u64 = 5 * 60 * 60;

/// Tracks the last time each alert key fired, throttling repeats.
pub struct AlertLog {
    path: PathBuf,
    map: Mutex<HashMap<String, u64>>,
}

impl AlertLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = load(&path);
        Self { path, map: Mutex::new(map) }
    }

    /// Record `key` firing at `now` if at least `min_gap` seconds have
    /// passed since it last fired (or it never fired). Returns whether the
    /// caller should actually send the alert.
    pub fn should_send_and_record(&self, key: &AlertKey, now: u64, min_gap: u64) -> bool {
        let key = key.as_string();
        let mut map = self.map.lock();
        let should_send = match map.get(&key) {
            Some(&last) => now.saturating_sub(last) >= min_gap,
            None => true,
        };
        if should_send {
            map.insert(key, now);
            if let Err(e) = write_json_atomic(&self.path, &*map) {
                warn!(error = %e, "failed to persist alert log");
            }
        }
        should_send
    }
}

/// Corrupt or missing alert logs are treated as empty (§4.2).
fn load(path: &PathBuf) -> HashMap<String, u64> {
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "alert log unreadable, starting empty");
            HashMap::new()
        }),
        Err(_) => HashMap::new(),
    }
}
