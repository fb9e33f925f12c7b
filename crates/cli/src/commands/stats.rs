// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `beaconctl stats` (§4.6, §4.10) — aggregate counters plus per-website
//! uptime/trend detail.

use anyhow::{anyhow, Result};
use beacon_daemon::{AggregateCounters, WebsiteStatsView};
use beacon_wire::Request;

use crate::client::DaemonClient;
use crate::color;
use crate::output::{format_or_json, OutputFormat};

pub async fn stats(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let aggregate_response =
        client.send(&Request::GetStats).await.map_err(|e| anyhow!("{}", e))?;
    let aggregate: AggregateCounters = serde_json::from_value(
        aggregate_response.data.ok_or_else(|| anyhow!("daemon returned no stats payload"))?,
    )?;

    let website_response =
        client.send(&Request::GetWebsiteStats).await.map_err(|e| anyhow!("{}", e))?;
    let per_website: Vec<WebsiteStatsView> = serde_json::from_value(
        website_response.data.ok_or_else(|| anyhow!("daemon returned no website-stats payload"))?,
    )?;

    format_or_json(format, &serde_json::json!({"aggregate": aggregate, "websites": per_website}), || {
        println!(
            "Aggregate: {} checks, {} failures, {} cycles completed",
            aggregate.total_checks, aggregate.total_failures, aggregate.cycles_completed
        );
        if per_website.is_empty() {
            println!("\nNo websites monitored yet");
            return;
        }
        for site in &per_website {
            let status = match site.current_status {
                "Up" => color::good(site.current_status),
                "Down" => color::bad(site.current_status),
                other => other.to_string(),
            };
            println!("\n{} — {}", color::header(&site.url), status);
            println!(
                "  checks: {} ({} failed), consecutive failures: {}, emails sent: {}",
                site.total_checks, site.failed_checks, site.consecutive_failures, site.emails_sent
            );
            println!(
                "  uptime: 1h {:.1}%  1d {:.1}%  1w {:.1}%  trend: {}",
                site.uptime_last_hour * 100.0,
                site.uptime_last_day * 100.0,
                site.uptime_last_week * 100.0,
                site.trend
            );
            println!("  average response time: {}", site.average_response_time);
        }
    })
}
