// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`Browser`] double for engine-crate tests.

use async_trait::async_trait;
use beacon_core::Snapshot;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::{Browser, BrowserError, FailingRequest, RecordSignal, ReplayOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Probe { url: String },
    Replay { snapshot_id: String },
    Record { url: String },
}

/// Scripted [`Browser`] double. Configure `probe_failures`/`replay_outcome`
/// before exercising it; every call is pushed to `calls` for assertions.
pub struct FakeBrowser {
    pub calls: Mutex<Vec<RecordedCall>>,
    pub probe_failures: Mutex<Vec<FailingRequest>>,
    pub replay_outcome: Mutex<Option<Result<ReplayOutcome, String>>>,
    pub record_outcome: Mutex<Option<Snapshot>>,
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            probe_failures: Mutex::new(Vec::new()),
            replay_outcome: Mutex::new(None),
            record_outcome: Mutex::new(None),
        }
    }
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probe_failures(self, failures: Vec<FailingRequest>) -> Self {
        *self.probe_failures.lock() = failures;
        self
    }

    pub fn with_replay_outcome(self, outcome: ReplayOutcome) -> Self {
        *self.replay_outcome.lock() = Some(Ok(outcome));
        self
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn probe(
        &self,
        url: &str,
        _settle: std::time::Duration,
        _cancel: CancellationToken,
    ) -> Vec<FailingRequest> {
        self.calls.lock().push(RecordedCall::Probe { url: url.to_string() });
        self.probe_failures.lock().clone()
    }

    async fn replay(
        &self,
        snapshot: &Snapshot,
        _cancel: CancellationToken,
    ) -> Result<ReplayOutcome, BrowserError> {
        self.calls.lock().push(RecordedCall::Replay { snapshot_id: snapshot.id.as_str().to_string() });
        match self.replay_outcome.lock().clone() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(msg)) => Err(BrowserError::Navigation(msg)),
            None => Ok(ReplayOutcome {
                snapshot_id: snapshot.id.clone(),
                success: true,
                api_errors: Vec::new(),
                duration_ms: 0,
            }),
        }
    }

    async fn record(
        &self,
        url: &str,
        signal: tokio::sync::oneshot::Receiver<RecordSignal>,
    ) -> Result<Snapshot, BrowserError> {
        self.calls.lock().push(RecordedCall::Record { url: url.to_string() });
        match signal.await.unwrap_or(RecordSignal::Cancel) {
            RecordSignal::Cancel => Err(BrowserError::Cancelled),
            RecordSignal::Stop => {
                Ok(self.record_outcome.lock().clone().unwrap_or_else(|| Snapshot::new(url, Vec::new())))
            }
        }
    }
}
