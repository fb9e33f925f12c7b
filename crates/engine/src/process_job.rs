// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ProcessJob` (§4.9 worker pool step, §4.3 probe, §4.4 replay, §4.6 stats,
//! §4.8 alerting): everything one worker does with one [`Job`].

use std::sync::Arc;
use std::time::Instant;

use beacon_adapters::{Browser, Mailer};
use beacon_core::{AlertKey, Clock};
use beacon_storage::AlertLog;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::job::Job;
use crate::stats_registry::StatsRegistry;

/// Shared dependencies every worker needs to process a job. Cheap to clone
/// (everything inside is an `Arc`), so each worker holds its own copy.
#[derive(Clone)]
pub struct ProcessContext {
    pub browser: Arc<dyn Browser>,
    pub mailer: Arc<dyn Mailer>,
    pub alert_log: Arc<AlertLog>,
    pub stats: Arc<StatsRegistry>,
    pub snapshots: Arc<beacon_storage::SnapshotStore>,
    pub clock: Arc<dyn Clock>,
    pub probe_settle: std::time::Duration,
    pub min_alert_gap: u64,
}

/// Process one job end to end: probe, throttle and send the target alert,
/// update the target's stats, then (if the job carries a snapshot) replay
/// it and alert separately on captured API errors.
pub async fn process_job(ctx: &ProcessContext, job: &Job, cancel: CancellationToken) {
    let started = Instant::now();
    let failures = ctx.browser.probe(&job.url, ctx.probe_settle, cancel.clone()).await;
    let duration = started.elapsed();
    let now = ctx.clock.now_unix();
    let success = failures.is_empty();

    let alert_sent = if success {
        false
    } else {
        let key = AlertKey::target(job.url.clone());
        if ctx.alert_log.should_send_and_record(&key, now, ctx.min_alert_gap) {
            let body = render_failure_body(&failures);
            match ctx.mailer.send(&job.recipient, &format!("{} is down", job.url), &body).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(url = %job.url, error = %e, "failed to send target alert");
                    false
                }
            }
        } else {
            false
        }
    };

    ctx.stats.with_target(&job.url, now, |stats| stats.record_check(now, success, duration, alert_sent));
    info!(url = %job.url, success, failing = failures.len(), "checked target");

    if let Some(snapshot_id) = &job.snapshot_id {
        replay_snapshot(ctx, job, snapshot_id, cancel).await;
    }
}

async fn replay_snapshot(
    ctx: &ProcessContext,
    job: &Job,
    snapshot_id: &beacon_core::SnapshotId,
    cancel: CancellationToken,
) {
    let snapshot = match ctx.snapshots.load_by_id(snapshot_id) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(snapshot_id = %snapshot_id, error = %e, "snapshot unresolvable, skipping replay");
            return;
        }
    };

    let outcome = match ctx.browser.replay(&snapshot, cancel).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(snapshot_id = %snapshot_id, error = %e, "replay failed to complete");
            return;
        }
    };

    if outcome.api_errors.is_empty() {
        return;
    }

    let now = ctx.clock.now_unix();
    let key = AlertKey::snapshot(snapshot_id.clone());
    if !ctx.alert_log.should_send_and_record(&key, now, ctx.min_alert_gap) {
        return;
    }

    let body = render_replay_body(&outcome);
    if let Err(e) = ctx
        .mailer
        .send(&job.recipient, &format!("replay of {} captured API errors", job.url), &body)
        .await
    {
        warn!(snapshot_id = %snapshot_id, error = %e, "failed to send replay alert");
    }
}

fn render_failure_body(failures: &[beacon_adapters::FailingRequest]) -> String {
    failures.iter().map(|f| format!("{} {}", f.status, f.url)).collect::<Vec<_>>().join("\n")
}

fn render_replay_body(outcome: &beacon_adapters::ReplayOutcome) -> String {
    outcome.api_errors.iter().map(|f| format!("{} {}", f.status, f.url)).collect::<Vec<_>>().join("\n")
}
