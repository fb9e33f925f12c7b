// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recorder session management (§4.5).
//!
//! Recording is invoked over the control protocol — there is no standalone
//! recorder binary (SPEC_FULL §4.5). At most one recording session runs at
//! a time: `start` launches a headful browser and a background task that
//! blocks on [`Browser::record`]; `stop`/`cancel` resolve the signal the
//! background task is waiting on and, for `stop`, persists the resulting
//! snapshot.

use std::sync::Arc;

use beacon_adapters::{Browser, RecordSignal};
use beacon_core::Snapshot;
use beacon_storage::SnapshotStore;
use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecorderError {
    #[error("a recording session is already in progress")]
    AlreadyRecording,
    #[error("no recording session is in progress")]
    NotRecording,
    #[error("recording was cancelled")]
    Cancelled,
}

struct Session {
    signal: oneshot::Sender<RecordSignal>,
    handle: tokio::task::JoinHandle<Result<Snapshot, beacon_adapters::BrowserError>>,
}

/// Owns at most one in-flight recording session.
pub struct Recorder {
    browser: Arc<dyn Browser>,
    snapshots: Arc<SnapshotStore>,
    session: Mutex<Option<Session>>,
}

impl Recorder {
    pub fn new(browser: Arc<dyn Browser>, snapshots: Arc<SnapshotStore>) -> Self {
        Self { browser, snapshots, session: Mutex::new(None) }
    }

    /// Open a headful browser at `url` and begin capturing interactions.
    pub async fn start(&self, url: String) -> Result<(), RecorderError> {
        let mut slot = self.session.lock().await;
        if slot.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }
        let (tx, rx) = oneshot::channel();
        let browser = self.browser.clone();
        let handle = tokio::spawn(async move { browser.record(&url, rx).await });
        *slot = Some(Session { signal: tx, handle });
        Ok(())
    }

    /// Stop recording normally: the background task returns its accumulated
    /// [`Snapshot`], which is persisted before this call returns.
    pub async fn stop(&self) -> Result<Snapshot, RecorderError> {
        let session = self.session.lock().await.take().ok_or(RecorderError::NotRecording)?;
        let _ = session.signal.send(RecordSignal::Stop);
        let snapshot = session
            .handle
            .await
            .map_err(|_| RecorderError::Cancelled)?
            .map_err(|_| RecorderError::Cancelled)?;
        if let Err(e) = self.snapshots.save(&snapshot) {
            warn!(snapshot_id = %snapshot.id, error = %e, "failed to persist recorded snapshot");
        }
        Ok(snapshot)
    }

    /// Cancel recording: discard whatever was captured (§4.5: "On cancel it
    /// returns a failure without writing").
    pub async fn cancel(&self) -> Result<(), RecorderError> {
        let session = self.session.lock().await.take().ok_or(RecorderError::NotRecording)?;
        let _ = session.signal.send(RecordSignal::Cancel);
        let _ = session.handle.await;
        Ok(())
    }

    pub async fn is_recording(&self) -> bool {
        self.session.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_adapters::browser::FakeBrowser;
    use tempfile::tempdir;

    fn recorder(dir: &std::path::Path) -> Recorder {
        Recorder::new(Arc::new(FakeBrowser::new()), Arc::new(SnapshotStore::new(dir.join("snapshots"))))
    }

    #[tokio::test]
    async fn start_then_stop_persists_a_snapshot() {
        let dir = tempdir().unwrap();
        let recorder = recorder(dir.path());
        recorder.start("https://example.test".into()).await.unwrap();
        assert!(recorder.is_recording().await);

        let snapshot = recorder.stop().await.unwrap();
        assert_eq!(snapshot.starting_url, "https://example.test");
        assert!(!recorder.is_recording().await);
    }

    #[tokio::test]
    async fn cannot_start_twice() {
        let dir = tempdir().unwrap();
        let recorder = recorder(dir.path());
        recorder.start("https://example.test".into()).await.unwrap();
        assert_eq!(recorder.start("https://other.test".into()).await, Err(RecorderError::AlreadyRecording));
    }

    #[tokio::test]
    async fn stop_without_a_session_is_an_error() {
        let dir = tempdir().unwrap();
        let recorder = recorder(dir.path());
        assert_eq!(recorder.stop().await.unwrap_err(), RecorderError::NotRecording);
    }

    #[tokio::test]
    async fn cancel_discards_without_persisting() {
        let dir = tempdir().unwrap();
        let recorder = recorder(dir.path());
        recorder.start("https://example.test".into()).await.unwrap();
        recorder.cancel().await.unwrap();
        assert!(!recorder.is_recording().await);
    }
}
