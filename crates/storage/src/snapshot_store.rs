// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence (§4.1): one JSON file per snapshot, named by its id.

use std::fs;
use std::path::{Path, PathBuf};

use beacon_core::{Snapshot, SnapshotId};
use thiserror::Error;
use tracing::warn;

use crate::atomic::write_json_atomic;

#[derive(Debug, Error)]
pub enum SnapshotStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot not found: {0}")]
    NotFound(SnapshotId),
}

/// Directory of recorded snapshots, one file per id.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &SnapshotId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotStoreError> {
        write_json_atomic(&self.path_for(&snapshot.id), snapshot)?;
        Ok(())
    }

    pub fn load_by_id(&self, id: &SnapshotId) -> Result<Snapshot, SnapshotStoreError> {
        let path = self.path_for(id);
        let contents = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SnapshotStoreError::NotFound(id.clone())
            } else {
                SnapshotStoreError::Io(e)
            }
        })?;
        serde_json::from_str(&contents)
            .map_err(|_| SnapshotStoreError::NotFound(id.clone()))
    }

    /// All snapshots whose `starting_url` matches `url`.
    ///
    /// A file that fails to parse is logged and skipped rather than failing
    /// the whole scan (§4.1: one corrupt snapshot must not hide the rest).
    pub fn load_for_url(&self, url: &str) -> Result<Vec<Snapshot>, SnapshotStoreError> {
        let mut out = Vec::new();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
            Err(e) => return Err(SnapshotStoreError::Io(e)),
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_snapshot(&path) {
                Ok(snap) if snap.starting_url == url => out.push(snap),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable snapshot"),
            }
        }
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(out)
    }

    pub fn delete(&self, id: &SnapshotId) -> Result<(), SnapshotStoreError> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SnapshotStoreError::NotFound(id.clone()))
            }
            Err(e) => Err(SnapshotStoreError::Io(e)),
        }
    }
}

fn read_snapshot(path: &Path) -> Result<Snapshot, std::io::Error> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(std::io::Error::other)
}
