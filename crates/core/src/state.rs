// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle state machine (§3, §4.9, §8).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The daemon's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaemonState {
    Stopped,
    Running,
    Paused,
    Error,
}

impl Default for DaemonState {
    fn default() -> Self {
        DaemonState::Stopped
    }
}

/// Lifecycle events that drive [`DaemonState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start,
    Stop,
    Pause,
    Resume,
    SetConfig,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {event:?} from {from:?}")]
    InvalidTransition { from: DaemonState, event: Event },
    #[error("configuration is empty or absent")]
    ConfigRequired,
}

impl DaemonState {
    /// Apply an event, producing the next state or a [`TransitionError`].
    ///
    /// `config_ready` is only consulted for `Start` (§3: "Start requires
    /// non-empty Configuration"); every other event ignores it. This is the
    /// single source of truth for the transition table in §4.9 — every
    /// `(from, event, to)` triple other than the ones matched here is
    /// rejected.
    pub fn apply(self, event: Event, config_ready: bool) -> Result<DaemonState, TransitionError> {
        use DaemonState::*;
        use Event::*;

        match (self, event) {
            (Stopped, Start) => {
                if config_ready {
                    Ok(Running)
                } else {
                    Err(TransitionError::ConfigRequired)
                }
            }
            (Running, Stop) | (Paused, Stop) => Ok(Stopped),
            (Running, Pause) => Ok(Paused),
            (Paused, Resume) => Ok(Running),
            (Stopped, SetConfig) => Ok(Stopped),
            (from, event) => Err(TransitionError::InvalidTransition { from, event }),
        }
    }

    /// Demote a persisted `Running`/`Paused` state to `Stopped` on process
    /// start (§4.9: "monitoring never auto-resumes across restarts").
    pub fn demote_on_restart(self) -> DaemonState {
        match self {
            DaemonState::Running | DaemonState::Paused => DaemonState::Stopped,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DaemonState::*;
    use Event::*;

    #[test]
    fn start_requires_config() {
        assert_eq!(Stopped.apply(Start, false), Err(TransitionError::ConfigRequired));
        assert_eq!(Stopped.apply(Start, true), Ok(Running));
    }

    #[test]
    fn stop_valid_from_running_and_paused() {
        assert_eq!(Running.apply(Stop, true), Ok(Stopped));
        assert_eq!(Paused.apply(Stop, true), Ok(Stopped));
    }

    #[test]
    fn stop_invalid_from_stopped() {
        assert!(Stopped.apply(Stop, true).is_err());
    }

    #[test]
    fn pause_requires_running() {
        assert_eq!(Running.apply(Pause, true), Ok(Paused));
        assert!(Stopped.apply(Pause, true).is_err());
        assert!(Paused.apply(Pause, true).is_err());
    }

    #[test]
    fn resume_requires_paused() {
        assert_eq!(Paused.apply(Resume, true), Ok(Running));
        assert!(Running.apply(Resume, true).is_err());
    }

    #[test]
    fn set_config_only_valid_when_stopped() {
        assert_eq!(Stopped.apply(SetConfig, true), Ok(Stopped));
        assert!(Running.apply(SetConfig, true).is_err());
        assert!(Paused.apply(SetConfig, true).is_err());
    }

    #[test]
    fn restart_demotes_running_and_paused() {
        assert_eq!(Running.demote_on_restart(), Stopped);
        assert_eq!(Paused.demote_on_restart(), Stopped);
        assert_eq!(Stopped.demote_on_restart(), Stopped);
    }

    #[test]
    fn restart_then_start_reenters_running() {
        let persisted = Running;
        let after_restart = persisted.demote_on_restart();
        assert_eq!(after_restart, Stopped);
        assert_eq!(after_restart.apply(Start, true), Ok(Running));
    }
}
