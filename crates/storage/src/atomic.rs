// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-temp-then-rename persistence helper shared by every JSON document
//! this daemon keeps on disk (§6: "All JSON documents are pretty-printed
//! (2-space indent), UTF-8").

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

/// Serialize `value` as pretty JSON and write it atomically to `path`.
///
/// Writes to `<path>.tmp` first and renames over the destination, so a
/// crash mid-write never leaves a truncated document behind.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
    let tmp_path = path.with_extension(match path.extension() {
        Some(ext) => format!("{}.tmp", ext.to_string_lossy()),
        None => "tmp".to_string(),
    });
    fs::write(&tmp_path, &json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
