// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single unit of cycle work (§4.9): probe one target, optionally replay
//! one of its snapshots.

use beacon_core::SnapshotId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub url: String,
    pub recipient: String,
    pub snapshot_id: Option<SnapshotId>,
}

impl Job {
    pub fn new(url: impl Into<String>, recipient: impl Into<String>, snapshot_id: Option<SnapshotId>) -> Self {
        Self { url: url.into(), recipient: recipient.into(), snapshot_id }
    }
}
