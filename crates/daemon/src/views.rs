// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON response shapes for the control protocol (§4.10), kept separate
//! from the domain types they're built from so `beacon-core`/`beacon-engine`
//! never need to know about wire formatting (e.g. "times as `YYYY-MM-DD
//! HH:MM:SS`, durations as human strings").

use std::time::Duration;

use beacon_core::{DaemonState, TargetStats};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::handle::Handle;
use crate::persisted_state::AggregateCounters;

fn format_unix(unix: Option<u64>) -> Option<String> {
    unix.map(|secs| {
        Utc.timestamp_opt(secs as i64, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default()
    })
}

/// Human-readable duration, e.g. `"1h23m"`, `"45s"`, `"120ms"`.
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs == 0 {
        return format!("{}ms", d.as_millis());
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}h{minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusView {
    pub state: DaemonState,
    pub website_count: usize,
    pub email: String,
    pub has_config: bool,
    pub has_smtp: bool,
    pub stats: AggregateCounters,
}

pub fn status_view(handle: &Handle) -> StatusView {
    let config = handle.config();
    StatusView {
        state: handle.state(),
        website_count: config.websites.len(),
        email: config.email,
        has_config: !config.websites.is_empty(),
        has_smtp: handle.get_smtp().is_some(),
        stats: handle.aggregate_counters(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebsiteStatsView {
    pub url: String,
    pub total_checks: u64,
    pub failed_checks: u64,
    pub consecutive_failures: u64,
    pub consecutive_successes: u64,
    pub emails_sent: u64,
    pub current_status: &'static str,
    pub overall_health: f64,
    pub uptime_last_hour: f64,
    pub uptime_last_day: f64,
    pub uptime_last_week: f64,
    pub trend: &'static str,
    pub last_check: Option<String>,
    pub last_failure: Option<String>,
    pub last_success: Option<String>,
    pub first_monitored: String,
    pub average_response_time: String,
    pub last_downtime: Option<String>,
    pub longest_downtime: String,
    pub total_downtime: String,
}

pub fn website_stats_view(url: &str, stats: &TargetStats, now_unix: u64) -> WebsiteStatsView {
    use beacon_core::stats::{CurrentStatus, Trend};

    let current_status = match stats.current_status() {
        CurrentStatus::Up => "Up",
        CurrentStatus::Down => "Down",
        CurrentStatus::Unknown => "Unknown",
    };
    let trend = match stats.trend() {
        Trend::Improving => "improving",
        Trend::Stable => "stable",
        Trend::Degrading => "degrading",
    };

    WebsiteStatsView {
        url: url.to_string(),
        total_checks: stats.total_checks,
        failed_checks: stats.failed_checks,
        consecutive_failures: stats.consecutive_failures,
        consecutive_successes: stats.consecutive_successes,
        emails_sent: stats.emails_sent,
        current_status,
        overall_health: stats.overall_health(),
        uptime_last_hour: stats.uptime_last_hour(now_unix),
        uptime_last_day: stats.uptime_last_day(now_unix),
        uptime_last_week: stats.uptime_last_week(now_unix),
        trend,
        last_check: format_unix(stats.last_check),
        last_failure: format_unix(stats.last_failure),
        last_success: format_unix(stats.last_success),
        first_monitored: format_unix(Some(stats.first_monitored)).unwrap_or_default(),
        average_response_time: format_duration(stats.response_time_mean),
        last_downtime: stats.last_downtime.map(format_duration),
        longest_downtime: format_duration(stats.longest_downtime),
        total_downtime: format_duration(stats.total_downtime),
    }
}
