// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `beaconctl {start,stop,pause,resume}` — thin wrappers over the matching
//! control-protocol request, reporting the daemon's rejection message
//! verbatim (e.g. "configuration required before starting").

use anyhow::{anyhow, Result};
use beacon_wire::Request;

use crate::client::DaemonClient;

pub async fn start(client: &DaemonClient) -> Result<()> {
    run(client, Request::Start, "started").await
}

pub async fn stop(client: &DaemonClient) -> Result<()> {
    run(client, Request::Stop, "stopped").await
}

pub async fn pause(client: &DaemonClient) -> Result<()> {
    run(client, Request::Pause, "paused").await
}

pub async fn resume(client: &DaemonClient) -> Result<()> {
    run(client, Request::Resume, "resumed").await
}

async fn run(client: &DaemonClient, request: Request, verb: &str) -> Result<()> {
    client.send(&request).await.map_err(|e| anyhow!("{}", e))?;
    println!("beacond {}", verb);
    Ok(())
}
