// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup (§4.9, §6): resolve the data directory, take the
//! exclusive lock, load ambient settings and persisted state, and return a
//! [`Handle`] ready to be served over the control socket.

use std::fs::OpenOptions;
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use fs2::FileExt;
use tracing::info;

use crate::env::default_data_dir;
use crate::error::LifecycleError;
use crate::handle::Handle;
use crate::settings::{app_settings_path, DaemonSettings};

/// Held for the daemon's whole lifetime: releasing it (on drop) frees the
/// advisory lock on `daemon.pid`.
pub struct StartupResult {
    pub handle: Arc<Handle>,
    pub control_addr: SocketAddr,
    #[allow(dead_code)]
    lock_file: std::fs::File,
}

/// §4.9's "Startup acquires an exclusive advisory lock on `daemon.pid` ...
/// so a second `beacond` invocation fails fast with a clear error instead
/// of silently racing the first for the socket" (SPEC_FULL §4.9).
pub fn startup(data_dir: Option<PathBuf>, port: Option<u16>) -> Result<StartupResult, LifecycleError> {
    let data_dir = match data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir).map_err(LifecycleError::CreateDataDir)?;
    std::fs::create_dir_all(data_dir.join("snapshots")).map_err(LifecycleError::CreateDataDir)?;
    std::fs::create_dir_all(data_dir.join("smtp")).map_err(LifecycleError::CreateDataDir)?;
    std::fs::create_dir_all(data_dir.join("logs")).map_err(LifecycleError::CreateDataDir)?;

    let lock_path = data_dir.join("daemon.pid");
    let mut lock_file = OpenOptions::new().write(true).create(true).truncate(false).open(&lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    let mut settings = DaemonSettings::load(&app_settings_path(&data_dir));
    if let Some(port) = port {
        settings.control_port = port;
    }
    settings.save(&app_settings_path(&data_dir))?;

    info!(data_dir = %data_dir.display(), port = settings.control_port, "starting beacond");

    let control_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), settings.control_port);
    let handle = Arc::new(Handle::new(data_dir, settings));

    Ok(StartupResult { handle, control_addr, lock_file })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn startup_creates_the_expected_directory_tree() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let result = startup(Some(data_dir.clone()), Some(0)).unwrap();
        assert!(data_dir.join("snapshots").is_dir());
        assert!(data_dir.join("smtp").is_dir());
        assert!(data_dir.join("logs").is_dir());
        assert!(data_dir.join("daemon.pid").is_file());
        assert_eq!(result.handle.state(), beacon_core::DaemonState::Stopped);
    }

    #[test]
    fn second_startup_against_the_same_data_dir_fails_fast() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let first = startup(Some(data_dir.clone()), Some(0)).unwrap();
        let second = startup(Some(data_dir), Some(0));
        assert!(matches!(second, Err(LifecycleError::LockFailed(_))));
        drop(first);
    }
}
