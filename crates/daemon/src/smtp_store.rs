// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted SMTP credentials (§4.8, §6 `smtp/smtp-config.json`).

use std::path::{Path, PathBuf};

use beacon_adapters::SmtpCredentials;
use beacon_storage::write_json_atomic;
use tracing::warn;

pub fn smtp_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("smtp").join("smtp-config.json")
}

/// Load persisted SMTP credentials, or `None` if never configured or
/// unreadable (mirrors the snapshot/alert-log "corrupt is empty" rule).
pub fn load(path: &Path) -> Option<SmtpCredentials> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(creds) => Some(creds),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "smtp-config.json unreadable, treating as unconfigured");
                None
            }
        },
        Err(_) => None,
    }
}

pub fn save(path: &Path, creds: &SmtpCredentials) -> std::io::Result<()> {
    write_json_atomic(path, creds)
}
