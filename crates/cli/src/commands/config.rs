// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `beaconctl config {get,set}` (§4.10, §6).

use anyhow::{anyhow, Result};
use beacon_core::Configuration;
use beacon_wire::Request;

use crate::client::DaemonClient;
use crate::output::{format_or_json, OutputFormat};

pub async fn get(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let response = client.send(&Request::GetConfig).await.map_err(|e| anyhow!("{}", e))?;
    let config: Configuration = serde_json::from_value(
        response.data.ok_or_else(|| anyhow!("daemon returned no config payload"))?,
    )?;

    format_or_json(format, &config, || {
        println!("Email: {}", if config.email.is_empty() { "(none)" } else { &config.email });
        if config.websites.is_empty() {
            println!("Websites: (none)");
        } else {
            println!("Websites:");
            for url in &config.websites {
                let snapshots = config.snapshots_for(url).len();
                if snapshots > 0 {
                    println!("  {} ({} saved snapshot(s))", url, snapshots);
                } else {
                    println!("  {}", url);
                }
            }
        }
    })
}

/// Setting config replaces the whole document, so recorded snapshot
/// bindings for websites that are staying get carried over rather than
/// silently dropped by an otherwise-unrelated `config set`.
pub async fn set(client: &DaemonClient, email: String, websites: Vec<String>) -> Result<()> {
    let mut snapshot_ids = std::collections::HashMap::new();
    if let Ok(response) = client.send(&Request::GetConfig).await {
        if let Some(data) = response.data {
            if let Ok(existing) = serde_json::from_value::<Configuration>(data) {
                for url in &websites {
                    if let Some(ids) = existing.snapshot_ids.get(url) {
                        snapshot_ids.insert(url.clone(), ids.clone());
                    }
                }
            }
        }
    }

    let request = Request::SetConfig { email, websites, snapshot_ids };
    client.send(&request).await.map_err(|e| anyhow!("{}", e))?;
    println!("Configuration updated");
    Ok(())
}
