// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cycle scheduler and worker pool (§4.9).
//!
//! One long-lived pool of [`WORKER_COUNT`] workers drains a bounded job
//! queue; a separate cycle-driver task refills the queue once per
//! `cycle_interval` and waits for every job it enqueued to finish before
//! sleeping again. The driver and the workers share nothing but the queue
//! and a per-cycle completion channel, so `Stop`/`Pause` only has to cancel
//! the shared token — no other coordination is needed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use beacon_core::Configuration;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::job::Job;
use crate::process_job::{process_job, ProcessContext};

pub const WORKER_COUNT: usize = 30;
pub const QUEUE_CAPACITY: usize = 100;

struct JobEnvelope {
    job: Job,
    _done: mpsc::Sender<()>,
}

/// Handle to a running scheduler. Dropping it does not stop anything —
/// cancel the token passed to [`spawn`] and then `join` to wait for a clean
/// exit (§4.9: "On stop: close the job queue, join workers, return").
pub struct SchedulerHandle {
    pub last_cycle_started: Arc<AtomicU64>,
    driver: tokio::task::JoinHandle<()>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl SchedulerHandle {
    pub async fn join(self) {
        let _ = self.driver.await;
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

/// Spawn the cycle driver and its worker pool.
///
/// `config` is read fresh at the start of every cycle, so `SetConfig`
/// changes take effect on the next cycle without restarting the scheduler.
pub fn spawn(
    ctx: ProcessContext,
    config: Arc<RwLock<Configuration>>,
    cycle_interval: Duration,
    stop: CancellationToken,
) -> SchedulerHandle {
    let (job_tx, job_rx) = mpsc::channel::<JobEnvelope>(QUEUE_CAPACITY);
    let job_rx = Arc::new(tokio::sync::Mutex::new(job_rx));

    let workers = (0..WORKER_COUNT)
        .map(|_| spawn_worker(ctx.clone(), job_rx.clone(), stop.clone()))
        .collect();

    let last_cycle_started = Arc::new(AtomicU64::new(0));
    let driver = spawn_driver(ctx, config, cycle_interval, stop, job_tx, last_cycle_started.clone());

    SchedulerHandle { last_cycle_started, driver, workers }
}

fn spawn_worker(
    ctx: ProcessContext,
    job_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<JobEnvelope>>>,
    stop: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let envelope = {
                let mut rx = job_rx.lock().await;
                rx.recv().await
            };
            let Some(envelope) = envelope else { break };
            if stop.is_cancelled() {
                drop(envelope);
                continue;
            }
            process_job(&ctx, &envelope.job, stop.clone()).await;
        }
    })
}

fn spawn_driver(
    ctx: ProcessContext,
    config: Arc<RwLock<Configuration>>,
    cycle_interval: Duration,
    stop: CancellationToken,
    job_tx: mpsc::Sender<JobEnvelope>,
    last_cycle_started: Arc<AtomicU64>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while !stop.is_cancelled() {
            let snapshot = config.read().clone();
            let jobs = build_jobs(&snapshot);
            info!(count = jobs.len(), "queueing {} jobs", jobs.len());
            last_cycle_started.store(ctx.clock.now_unix(), Ordering::Relaxed);

            let (done_tx, mut done_rx) = mpsc::channel::<()>(1);
            for job in jobs {
                let envelope = JobEnvelope { job, _done: done_tx.clone() };
                tokio::select! {
                    res = job_tx.send(envelope) => {
                        if res.is_err() {
                            break;
                        }
                    }
                    _ = stop.cancelled() => break,
                }
            }
            drop(done_tx);
            while done_rx.recv().await.is_some() {}

            tokio::select! {
                _ = tokio::time::sleep(cycle_interval) => {}
                _ = stop.cancelled() => break,
            }
        }
    })
}

/// One job per target, and an extra job per attached snapshot (so every
/// snapshot gets replayed once a cycle alongside its target's probe).
fn build_jobs(config: &Configuration) -> Vec<Job> {
    let mut jobs = Vec::new();
    for url in &config.websites {
        let snapshots = config.snapshots_for(url);
        if snapshots.is_empty() {
            jobs.push(Job::new(url.clone(), config.email.clone(), None));
        } else {
            for snapshot_id in snapshots {
                jobs.push(Job::new(url.clone(), config.email.clone(), Some(snapshot_id.clone())));
            }
        }
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_adapters::browser::FakeBrowser;
    use beacon_adapters::mailer::FakeMailer;
    use beacon_core::FakeClock;
    use tempfile::tempdir;

    fn test_ctx(dir: &std::path::Path) -> ProcessContext {
        ProcessContext {
            browser: Arc::new(FakeBrowser::new()),
            mailer: Arc::new(FakeMailer::new()),
            alert_log: Arc::new(beacon_storage::AlertLog::new(dir.join("alerts.json"))),
            stats: Arc::new(crate::stats_registry::StatsRegistry::new()),
            snapshots: Arc::new(beacon_storage::SnapshotStore::new(dir.join("snapshots"))),
            clock: Arc::new(FakeClock::new(1_000)),
            probe_settle: Duration::from_millis(1),
            min_alert_gap: 5 * 60 * 60,
        }
    }

    #[test]
    fn build_jobs_emits_one_job_per_plain_target() {
        let config = Configuration::new("a@b.c", vec!["https://x.test".into(), "https://y.test".into()]);
        let jobs = build_jobs(&config);
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.snapshot_id.is_none()));
    }

    #[test]
    fn build_jobs_emits_one_job_per_snapshot() {
        let mut config = Configuration::new("a@b.c", vec!["https://x.test".into()]);
        config.snapshot_ids.insert(
            "https://x.test".into(),
            vec![beacon_core::SnapshotId::from_str("1"), beacon_core::SnapshotId::from_str("2")],
        );
        let jobs = build_jobs(&config);
        assert_eq!(jobs.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn scheduler_runs_a_cycle_and_stops_cleanly() {
        let dir = tempdir().unwrap();
        let ctx = test_ctx(dir.path());
        let stats = ctx.stats.clone();
        let config = Arc::new(RwLock::new(Configuration::new("a@b.c", vec!["https://x.test".into()])));
        let stop = CancellationToken::new();

        let handle = spawn(ctx, config, Duration::from_secs(60), stop.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        stop.cancel();
        handle.join().await;

        assert!(stats.snapshot("https://x.test").is_some());
    }
}
