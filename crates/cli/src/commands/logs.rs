// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `beaconctl logs` (§4.7, §4.10) — the in-memory ring buffer, not the
//! on-disk `logs/daemon.log` file (that one is for operators reading the
//! process's own stderr mirror, not the control protocol).

use anyhow::{anyhow, Result};
use beacon_wire::Request;

use crate::client::DaemonClient;
use crate::output::{format_or_json, OutputFormat};

pub async fn logs(client: &DaemonClient, lines: usize, format: OutputFormat) -> Result<()> {
    let response =
        client.send(&Request::GetLogs { lines }).await.map_err(|e| anyhow!("{}", e))?;
    let entries: Vec<String> = serde_json::from_value(
        response.data.ok_or_else(|| anyhow!("daemon returned no log payload"))?,
    )?;

    format_or_json(format, &entries, || {
        if entries.is_empty() {
            println!("No log entries");
        } else {
            for line in &entries {
                println!("{}", line);
            }
        }
    })
}

pub async fn clear(client: &DaemonClient) -> Result<()> {
    client.send(&Request::ClearLogs).await.map_err(|e| anyhow!("{}", e))?;
    println!("Log buffer cleared");
    Ok(())
}
