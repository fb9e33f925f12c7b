// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request types (§4.10).

use std::collections::HashMap;

use beacon_core::SnapshotId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_log_lines() -> usize {
    100
}

/// One control-protocol request. Adjacently tagged so the wire shape is
/// exactly `{"type": "...", "payload": ...}` per §4.10, with `payload` null
/// for the variants that carry none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    Ping,
    Status,
    Start,
    Stop,
    Pause,
    Resume,
    SetConfig {
        email: String,
        websites: Vec<String>,
        #[serde(default)]
        snapshot_ids: HashMap<String, Vec<SnapshotId>>,
    },
    GetConfig,
    GetLogs {
        #[serde(default = "default_log_lines")]
        lines: usize,
    },
    ClearLogs,
    GetStats,
    GetWebsiteStats,
    SetSmtp {
        host: String,
        port: u16,
        username: String,
        password: String,
        from: String,
    },
    GetSmtp,
}

/// Parse one line into a [`Request`], or the offending type string on
/// failure so the caller can build `"unknown command: X"` (§4.10, §7
/// ProtocolMalformed).
pub fn parse_request(line: &str) -> Result<Request, String> {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => Ok(request),
        Err(_) => {
            let raw: Value = serde_json::from_str(line).map_err(|_| "malformed".to_string())?;
            let kind = raw.get("type").and_then(Value::as_str).unwrap_or("malformed").to_string();
            Err(kind)
        }
    }
}
