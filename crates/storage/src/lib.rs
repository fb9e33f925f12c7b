// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! beacon-storage: on-disk and in-memory persistence for the site-monitoring
//! daemon (snapshot files, alert throttle log, log ring buffer).

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

mod atomic;
mod alert_log;
mod log_ring;
mod snapshot_store;

pub use alert_log::{AlertLog, DEFAULT_MIN_GAP_SECS};
pub use atomic::write_json_atomic;
pub use log_ring::LogRing;
pub use snapshot_store::{SnapshotStore, SnapshotStoreError};
