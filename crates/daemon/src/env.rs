// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate (§6).

use std::path::PathBuf;

use crate::error::LifecycleError;

/// Resolve the daemon's data directory: `BEACON_DATA_DIR` >
/// `XDG_STATE_HOME/beacon` > `~/.apiwatcher`.
///
/// The last fallback matches the layout spec §6 names for the per-user
/// home directory; the first two give operators and packagers a way to
/// relocate it without touching `$HOME`.
pub fn default_data_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("BEACON_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("beacon"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoDataDir)?;
    Ok(home.join(".apiwatcher"))
}

/// Default control-socket port (§6).
pub const DEFAULT_CONTROL_PORT: u16 = 9876;
