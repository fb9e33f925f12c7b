// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitoring configuration (§3): alert recipient, targets, and the
//! target → snapshot-ids mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::snapshot::SnapshotId;

/// The set of targets to monitor and where alerts go.
///
/// `websites` is an ordered list — the cycle scheduler enqueues jobs in this
/// order (§4.9), even though workers then execute them concurrently.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Configuration {
    pub email: String,
    pub websites: Vec<String>,
    #[serde(default)]
    pub snapshot_ids: HashMap<String, Vec<SnapshotId>>,
}

impl Configuration {
    pub fn new(email: impl Into<String>, websites: Vec<String>) -> Self {
        Self { email: email.into(), websites, snapshot_ids: HashMap::new() }
    }

    /// Start requires a non-empty configuration (§3, §4.9, §8 boundary case).
    pub fn is_empty(&self) -> bool {
        self.websites.is_empty()
    }

    pub fn snapshots_for(&self, url: &str) -> &[SnapshotId] {
        self.snapshot_ids.get(url).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
