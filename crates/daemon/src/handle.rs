// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon core (C9, §4.9): owns the lifecycle state machine,
//! configuration, aggregate counters, and every other component, and is
//! the single mutation point every control-protocol handler goes through.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use beacon_adapters::{Browser, ChromiumoxideBrowser, Mailer, SmtpCredentials};
use beacon_core::{Clock, Configuration, DaemonState, Event, SystemClock, TargetStats, TransitionError};
use beacon_engine::{ProcessContext, SchedulerHandle, StatsRegistry};
use beacon_storage::{AlertLog, LogRing, SnapshotStore, DEFAULT_MIN_GAP_SECS};
use parking_lot::RwLock;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::mailer_bridge::HandleMailer;
use crate::persisted_state::{daemon_state_path, AggregateCounters, PersistedState};
use crate::recorder::Recorder;
use crate::settings::DaemonSettings;
use crate::smtp_store;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("SMTP is not configured")]
    SmtpNotConfigured(#[from] beacon_adapters::CredentialsError),
}

/// Everything needed to run a monitoring cycle, plus the state the control
/// protocol reads and mutates (§3 ownership: "The Daemon core exclusively
/// owns Configuration, the snapshot-identifier map, per-target Statistics,
/// and the Log ring buffer").
pub struct Handle {
    pub data_dir: PathBuf,
    pub settings: DaemonSettings,

    state: RwLock<DaemonState>,
    config: RwLock<Configuration>,
    aggregate: RwLock<AggregateCounters>,
    smtp: Arc<RwLock<Option<SmtpCredentials>>>,

    pub stats: Arc<StatsRegistry>,
    pub logs: Arc<LogRing>,
    pub alert_log: Arc<AlertLog>,
    pub snapshots: Arc<SnapshotStore>,
    pub recorder: Recorder,

    browser: Arc<dyn Browser>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,

    scheduler: tokio::sync::Mutex<Option<(SchedulerHandle, CancellationToken)>>,
}

impl Handle {
    pub fn new(data_dir: PathBuf, settings: DaemonSettings) -> Self {
        Self::with_browser(data_dir, settings, None)
    }

    /// Construct with an explicit browser override (tests inject
    /// [`beacon_adapters::browser::FakeBrowser`] here).
    pub fn with_browser(data_dir: PathBuf, settings: DaemonSettings, browser: Option<Arc<dyn Browser>>) -> Self {
        let mut persisted = PersistedState::load(&daemon_state_path(&data_dir)).demote_on_restart();
        let smtp = Arc::new(RwLock::new(smtp_store::load(&crate::smtp_store::smtp_config_path(&data_dir))));
        let snapshots = Arc::new(SnapshotStore::new(data_dir.join("snapshots")));
        drop_unresolvable_snapshots(&mut persisted.config, &snapshots);

        let browser = browser.unwrap_or_else(|| Arc::new(ChromiumoxideBrowser::new(settings.headless)) as Arc<dyn Browser>);

        Self {
            state: RwLock::new(persisted.state),
            config: RwLock::new(persisted.config),
            aggregate: RwLock::new(persisted.aggregate),
            smtp: smtp.clone(),
            stats: Arc::new(StatsRegistry::new()),
            logs: Arc::new(LogRing::new()),
            alert_log: Arc::new(AlertLog::new(data_dir.join("alert_log.json"))),
            recorder: Recorder::new(browser.clone(), snapshots.clone()),
            snapshots,
            browser,
            mailer: Arc::new(HandleMailer::new(smtp)),
            clock: Arc::new(SystemClock),
            scheduler: tokio::sync::Mutex::new(None),
            data_dir,
            settings,
        }
    }

    fn log(&self, level: tracing::Level, line: String) {
        self.logs.append(&line);
        match level {
            tracing::Level::WARN => warn!("{line}"),
            tracing::Level::ERROR => error!("{line}"),
            _ => info!("{line}"),
        }
    }

    fn persist(&self) {
        let persisted = PersistedState {
            state: *self.state.read(),
            config: self.config.read().clone(),
            aggregate: self.aggregate.read().clone(),
            last_saved_unix: self.clock.now_unix(),
        };
        if let Err(e) = persisted.save(&daemon_state_path(&self.data_dir)) {
            self.log(tracing::Level::ERROR, format!("failed to persist daemon state: {e}"));
        }
    }

    pub fn state(&self) -> DaemonState {
        *self.state.read()
    }

    pub fn config(&self) -> Configuration {
        self.config.read().clone()
    }

    // ---- lifecycle transitions (§4.9 table) ----

    pub async fn start(&self) -> Result<(), HandleError> {
        let config_ready = !self.config.read().is_empty();
        let next = self.state.read().apply(Event::Start, config_ready)?;
        *self.state.write() = next;
        self.persist();
        self.spawn_scheduler().await;
        self.log(tracing::Level::INFO, "daemon started".to_string());
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), HandleError> {
        let next = self.state.read().apply(Event::Stop, true)?;
        *self.state.write() = next;
        self.persist();
        self.join_scheduler().await;
        self.log(tracing::Level::INFO, "daemon stopped".to_string());
        Ok(())
    }

    pub async fn pause(&self) -> Result<(), HandleError> {
        let next = self.state.read().apply(Event::Pause, true)?;
        *self.state.write() = next;
        self.persist();
        self.join_scheduler().await;
        self.log(tracing::Level::INFO, "daemon paused".to_string());
        Ok(())
    }

    pub async fn resume(&self) -> Result<(), HandleError> {
        let next = self.state.read().apply(Event::Resume, true)?;
        *self.state.write() = next;
        self.persist();
        self.spawn_scheduler().await;
        self.log(tracing::Level::INFO, "daemon resumed".to_string());
        Ok(())
    }

    pub fn set_config(&self, config: Configuration) -> Result<(), HandleError> {
        self.state.read().apply(Event::SetConfig, true)?;
        *self.config.write() = config;
        self.persist();
        Ok(())
    }

    pub fn set_smtp(&self, creds: SmtpCredentials) {
        *self.smtp.write() = Some(creds);
    }

    pub fn get_smtp(&self) -> Option<SmtpCredentials> {
        self.smtp.read().clone()
    }

    async fn spawn_scheduler(&self) {
        let mut slot = self.scheduler.lock().await;
        if slot.is_some() {
            return;
        }
        let stop = CancellationToken::new();
        let ctx = ProcessContext {
            browser: self.browser.clone(),
            mailer: self.mailer.clone(),
            alert_log: self.alert_log.clone(),
            stats: self.stats.clone(),
            snapshots: self.snapshots.clone(),
            clock: self.clock.clone(),
            probe_settle: self.settings.probe_settle(),
            min_alert_gap: DEFAULT_MIN_GAP_SECS,
        };
        let config = Arc::new(RwLock::new(self.config.read().clone()));
        let handle = beacon_engine::spawn(ctx, config, self.settings.cycle_interval(), stop.clone());
        *slot = Some((handle, stop));
    }

    async fn join_scheduler(&self) {
        let mut slot = self.scheduler.lock().await;
        if let Some((handle, stop)) = slot.take() {
            stop.cancel();
            handle.join().await;
        }
    }

    // ---- queries (§4.10) ----

    pub fn total_targets(&self) -> usize {
        self.config.read().websites.len()
    }

    pub fn aggregate_counters(&self) -> AggregateCounters {
        self.aggregate.read().clone()
    }

    pub fn target_stats(&self, url: &str) -> Option<TargetStats> {
        self.stats.snapshot(url)
    }

    pub fn all_target_stats(&self) -> Vec<(String, TargetStats)> {
        let mut urls = self.stats.urls();
        urls.sort();
        urls.into_iter().filter_map(|url| self.stats.snapshot(&url).map(|s| (url, s))).collect()
    }

    pub fn now_unix(&self) -> u64 {
        self.clock.now_unix()
    }
}

/// §4.9: "On load, unresolvable snapshot IDs are logged and dropped (the
/// target still monitors, just without replay)."
fn drop_unresolvable_snapshots(config: &mut Configuration, snapshots: &SnapshotStore) {
    config.snapshot_ids.retain(|url, ids| {
        ids.retain(|id| {
            let resolvable = snapshots.load_by_id(id).is_ok();
            if !resolvable {
                warn!(target = %url, snapshot_id = %id, "snapshot unresolvable at load, dropping from target");
            }
            resolvable
        });
        !ids.is_empty()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_adapters::browser::FakeBrowser;
    use beacon_core::{Snapshot, SnapshotId};
    use tempfile::tempdir;

    fn handle(dir: &std::path::Path) -> Handle {
        Handle::with_browser(dir.to_path_buf(), DaemonSettings::default(), Some(Arc::new(FakeBrowser::new())))
    }

    #[test]
    fn drop_unresolvable_snapshots_prunes_ids_and_empties_vectors() {
        let dir = tempdir().unwrap();
        let snapshots = SnapshotStore::new(dir.path().join("snapshots"));
        let good = Snapshot::new("https://x.test", Vec::new());
        snapshots.save(&good).unwrap();

        let mut config = Configuration::new("a@b.c", vec!["https://x.test".into(), "https://y.test".into()]);
        config
            .snapshot_ids
            .insert("https://x.test".into(), vec![good.id.clone(), SnapshotId::from_str("missing")]);
        config.snapshot_ids.insert("https://y.test".into(), vec![SnapshotId::from_str("also-missing")]);

        drop_unresolvable_snapshots(&mut config, &snapshots);

        assert_eq!(config.snapshot_ids.get("https://x.test"), Some(&vec![good.id]));
        assert_eq!(config.snapshot_ids.get("https://y.test"), None, "empty vector must be pruned entirely");
    }

    #[tokio::test]
    async fn start_requires_non_empty_configuration() {
        let dir = tempdir().unwrap();
        let handle = handle(dir.path());
        assert_eq!(
            handle.start().await.unwrap_err(),
            HandleError::Transition(TransitionError::ConfigRequired)
        );
    }

    #[tokio::test]
    async fn start_then_stop_then_start_reenters_running_with_same_config() {
        let dir = tempdir().unwrap();
        let handle = handle(dir.path());
        let config = Configuration::new("a@b.c", vec!["https://x.test".into()]);
        handle.set_config(config.clone()).unwrap();

        handle.start().await.unwrap();
        assert_eq!(handle.state(), DaemonState::Running);
        handle.stop().await.unwrap();
        assert_eq!(handle.state(), DaemonState::Stopped);
        handle.start().await.unwrap();
        assert_eq!(handle.state(), DaemonState::Running);
        assert_eq!(handle.config(), config);
        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn set_config_while_running_is_rejected() {
        let dir = tempdir().unwrap();
        let handle = handle(dir.path());
        handle.set_config(Configuration::new("a@b.c", vec!["https://x.test".into()])).unwrap();
        handle.start().await.unwrap();

        let err = handle.set_config(Configuration::new("x@y.c", vec!["https://y.test".into()])).unwrap_err();
        assert!(matches!(err, HandleError::Transition(TransitionError::InvalidTransition { .. })));
        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn restart_demotes_persisted_running_state() {
        let dir = tempdir().unwrap();
        {
            let handle = handle(dir.path());
            handle.set_config(Configuration::new("a@b.c", vec!["https://x.test".into()])).unwrap();
            handle.start().await.unwrap();
            // simulate a crash: no stop(), state file still says Running.
        }
        let restarted = handle(dir.path());
        assert_eq!(restarted.state(), DaemonState::Stopped);
    }
}
