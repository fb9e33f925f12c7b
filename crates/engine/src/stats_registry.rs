// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-target statistics storage (§4.6), shared across the worker pool.
//!
//! A target's [`TargetStats`] is guarded by its own lock so workers probing
//! different targets never contend with each other; the outer map lock is
//! only held long enough to find or insert an entry.

use std::collections::HashMap;
use std::sync::Arc;

use beacon_core::TargetStats;
use parking_lot::{Mutex, RwLock};

#[derive(Default)]
pub struct StatsRegistry {
    targets: RwLock<HashMap<String, Arc<Mutex<TargetStats>>>>,
}

impl StatsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, url: &str, now_unix: u64) -> Arc<Mutex<TargetStats>> {
        if let Some(stats) = self.targets.read().get(url) {
            return stats.clone();
        }
        self.targets
            .write()
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TargetStats::new(now_unix))))
            .clone()
    }

    /// Run `f` against the target's stats, creating an empty entry (stamped
    /// with `now_unix` as `first_monitored`) on first use.
    pub fn with_target<R>(&self, url: &str, now_unix: u64, f: impl FnOnce(&mut TargetStats) -> R) -> R {
        let stats = self.entry(url, now_unix);
        let mut guard = stats.lock();
        f(&mut guard)
    }

    pub fn snapshot(&self, url: &str) -> Option<TargetStats> {
        self.targets.read().get(url).map(|stats| stats.lock().clone())
    }

    pub fn urls(&self) -> Vec<String> {
        self.targets.read().keys().cloned().collect()
    }
}
