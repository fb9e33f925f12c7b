// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `beaconctl smtp {get,set}` (§4.8, §4.10).

use anyhow::{anyhow, Result};
use beacon_wire::Request;

use crate::client::DaemonClient;
use crate::output::{format_or_json, OutputFormat};

pub async fn get(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match client.send(&Request::GetSmtp).await {
        Ok(response) => {
            let data = response.data.ok_or_else(|| anyhow!("daemon returned no SMTP payload"))?;
            format_or_json(format, &data, || {
                println!("{}", serde_json::to_string_pretty(&data).unwrap_or_default());
            })
        }
        Err(e) => {
            let message = e.to_string();
            format_or_json(format, &serde_json::json!({"configured": false}), || {
                println!("SMTP not configured: {}", message);
            })
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn set(
    client: &DaemonClient,
    host: String,
    port: u16,
    username: String,
    password: String,
    from: String,
) -> Result<()> {
    let request = Request::SetSmtp { host, port, username, password, from };
    client.send(&request).await.map_err(|e| anyhow!("{}", e))?;
    println!("SMTP credentials saved");
    Ok(())
}
