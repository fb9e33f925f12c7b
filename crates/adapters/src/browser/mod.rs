// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Browser automation capability (§4.3, §4.4, §4.5).
//!
//! `Browser` is the narrow interface the probe, replay, and recording
//! engines drive a headless/headful Chrome instance through. Keeping it a
//! trait lets the engine crate be tested against [`FakeBrowser`] without
//! ever launching a real browser.

mod chromiumoxide_browser;
mod filter;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use chromiumoxide_browser::ChromiumoxideBrowser;
pub use filter::is_static_asset;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBrowser, RecordedCall};

use async_trait::async_trait;
use beacon_core::{Action, Snapshot, SnapshotId};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// One HTTP response observed during a probe or replay, after the
/// static-asset filter has already dropped the ones that don't count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailingRequest {
    pub url: String,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub snapshot_id: SnapshotId,
    pub success: bool,
    pub api_errors: Vec<FailingRequest>,
    pub duration_ms: u64,
}

/// Why a recording session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSignal {
    /// Stop normally: return the accumulated Snapshot.
    Stop,
    /// Cancel: discard everything captured so far.
    Cancel,
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("action failed: {0}")]
    Action(String),
    #[error("replay exceeded the {0}s wall-clock ceiling")]
    Timeout(u64),
    #[error("cancelled")]
    Cancelled,
}

#[async_trait]
pub trait Browser: Send + Sync + 'static {
    /// Navigate to `url`, hold the page open for `settle`, and return every
    /// ≥400 response observed (after the static-asset filter), per §4.3.
    /// A transport-level failure is represented as a single synthetic
    /// `FailingRequest` with status 0, never as an `Err`.
    async fn probe(
        &self,
        url: &str,
        settle: std::time::Duration,
        cancel: CancellationToken,
    ) -> Vec<FailingRequest>;

    /// Replay a recorded [`Snapshot`], per §4.4.
    async fn replay(
        &self,
        snapshot: &Snapshot,
        cancel: CancellationToken,
    ) -> Result<ReplayOutcome, BrowserError>;

    /// Open a headful browser at `url` and record interactions until
    /// `signal` resolves, per §4.5.
    async fn record(
        &self,
        url: &str,
        signal: tokio::sync::oneshot::Receiver<RecordSignal>,
    ) -> Result<Snapshot, BrowserError>;
}

/// Collapse consecutive `input` actions on the same selector into the last
/// one, and drop `change` actions entirely (§4.4 action preprocessing).
pub fn preprocess_actions(actions: &[Action]) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::with_capacity(actions.len());
    for action in actions {
        if matches!(action, Action::Change { .. }) {
            continue;
        }
        if let Action::Input { selector, .. } = action {
            if let Some(Action::Input { selector: last_selector, .. }) = out.last() {
                if last_selector == selector {
                    out.pop();
                }
            }
        }
        out.push(action.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_consecutive_input_on_same_selector() {
        let actions = vec![
            Action::Input { selector: "#a".into(), value: "h".into() },
            Action::Input { selector: "#a".into(), value: "he".into() },
            Action::Input { selector: "#a".into(), value: "hello".into() },
        ];
        let out = preprocess_actions(&actions);
        assert_eq!(
            out,
            vec![Action::Input { selector: "#a".into(), value: "hello".into() }]
        );
    }

    #[test]
    fn does_not_collapse_across_different_selectors() {
        let actions = vec![
            Action::Input { selector: "#a".into(), value: "x".into() },
            Action::Input { selector: "#b".into(), value: "y".into() },
        ];
        assert_eq!(preprocess_actions(&actions), actions);
    }

    #[test]
    fn drops_change_actions() {
        let actions = vec![
            Action::Navigate { url: "https://example.test".into() },
            Action::Change { selector: "#a".into(), value: "v".into() },
        ];
        let out = preprocess_actions(&actions);
        assert_eq!(out, vec![Action::Navigate { url: "https://example.test".into() }]);
    }

    #[test]
    fn non_input_actions_pass_through_untouched() {
        let actions = vec![
            Action::Click { selector: "#a".into(), text: None, aria_label: None, classes: None },
            Action::Keydown { selector: "#a".into(), key: "Enter".into() },
        ];
        assert_eq!(preprocess_actions(&actions), actions);
    }
}
