// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `beaconctl status` — current lifecycle state and a one-line summary.

use anyhow::{anyhow, Result};
use beacon_daemon::StatusView;
use beacon_wire::Request;

use crate::client::DaemonClient;
use crate::output::{format_or_json, OutputFormat};

pub async fn status(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let response = match client.send(&Request::Status).await {
        Ok(r) => r,
        Err(e) if e.is_not_running() => return print_not_running(format),
        Err(e) => return Err(anyhow!("{}", e)),
    };
    let view: StatusView = serde_json::from_value(
        response.data.ok_or_else(|| anyhow!("daemon returned no status payload"))?,
    )?;

    format_or_json(format, &view, || {
        let state = format!("{:?}", view.state);
        println!("Status: {}", crate::color::header(&state));
        println!("Websites monitored: {}", view.website_count);
        println!("Alert email: {}", if view.email.is_empty() { "(none)" } else { &view.email });
        println!("Config present: {}", view.has_config);
        println!("SMTP configured: {}", view.has_smtp);
        println!(
            "Checks: {} total, {} failures, {} cycles completed",
            view.stats.total_checks, view.stats.total_failures, view.stats.cycles_completed
        );
    })
}

fn print_not_running(format: OutputFormat) -> Result<()> {
    let obj = serde_json::json!({ "status": "not_running" });
    format_or_json(format, &obj, || println!("beacond is not running"))
}
