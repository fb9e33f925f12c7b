// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-target statistics and trend classification (§4.6, §8).

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// History is capped at 2000 entries, FIFO eviction (§3, §8).
pub const HISTORY_CAP: usize = 2000;
/// Response-time ring is capped at 100 entries, FIFO eviction (§3, §8).
pub const RESPONSE_RING_CAP: usize = 100;

const HOUR: u64 = 3_600;
const DAY: u64 = 86_400;
const WEEK: u64 = 604_800;

/// One completed check: when it ran, whether it succeeded, and how long it took.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub at_unix: u64,
    pub success: bool,
    pub duration: Duration,
}

/// Trend over the most recent history entries (§4.6 step 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Degrading,
}

/// Derived "is it up right now" status (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentStatus {
    Up,
    Down,
    Unknown,
}

/// Rolling counters and bounded history for a single monitored target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetStats {
    pub total_checks: u64,
    pub failed_checks: u64,
    pub consecutive_failures: u64,
    pub consecutive_successes: u64,
    pub emails_sent: u64,
    pub last_check: Option<u64>,
    pub last_failure: Option<u64>,
    pub last_success: Option<u64>,
    pub first_monitored: u64,
    pub history: VecDeque<CheckRecord>,
    pub response_times: VecDeque<Duration>,
    pub response_time_mean: Duration,
    pub last_downtime: Option<Duration>,
    pub longest_downtime: Duration,
    pub total_downtime: Duration,
    pub downtime_open_since: Option<u64>,
    pub last_alert: Option<u64>,
}

impl TargetStats {
    pub fn new(first_seen_unix: u64) -> Self {
        Self {
            total_checks: 0,
            failed_checks: 0,
            consecutive_failures: 0,
            consecutive_successes: 0,
            emails_sent: 0,
            last_check: None,
            last_failure: None,
            last_success: None,
            first_monitored: first_seen_unix,
            history: VecDeque::new(),
            response_times: VecDeque::new(),
            response_time_mean: Duration::ZERO,
            last_downtime: None,
            longest_downtime: Duration::ZERO,
            total_downtime: Duration::ZERO,
            downtime_open_since: None,
            last_alert: None,
        }
    }

    /// Record the outcome of one check (§4.6 steps 1-6).
    pub fn record_check(&mut self, now_unix: u64, success: bool, duration: Duration, alert_sent: bool) {
        self.total_checks += 1;
        self.last_check = Some(now_unix);

        self.history.push_back(CheckRecord { at_unix: now_unix, success, duration });
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }

        if duration > Duration::ZERO {
            self.response_times.push_back(duration);
            while self.response_times.len() > RESPONSE_RING_CAP {
                self.response_times.pop_front();
            }
            let sum: Duration = self.response_times.iter().sum();
            self.response_time_mean = sum / self.response_times.len() as u32;
        }

        if success {
            self.consecutive_successes += 1;
            self.consecutive_failures = 0;
            self.last_success = Some(now_unix);

            if let Some(start) = self.downtime_open_since.take() {
                let downtime = Duration::from_secs(now_unix.saturating_sub(start));
                self.total_downtime += downtime;
                if downtime > self.longest_downtime {
                    self.longest_downtime = downtime;
                }
                self.last_downtime = Some(downtime);
            }
        } else {
            self.failed_checks += 1;
            self.consecutive_failures += 1;
            self.consecutive_successes = 0;
            self.last_failure = Some(now_unix);

            if self.consecutive_failures == 1 {
                self.downtime_open_since = Some(now_unix);
            }
            if alert_sent {
                self.emails_sent += 1;
                self.last_alert = Some(now_unix);
            }
        }
    }

    /// `(total - failed) / total * 100`, or 100 when `total == 0` (§4.6 step 6, §8).
    pub fn overall_health(&self) -> f64 {
        if self.total_checks == 0 {
            100.0
        } else {
            (self.total_checks - self.failed_checks) as f64 / self.total_checks as f64 * 100.0
        }
    }

    /// Uptime percentage over the trailing window, scanning history backward
    /// until an entry predates `now - window` (§4.6 step 7).
    pub fn uptime_over(&self, now_unix: u64, window: Duration) -> f64 {
        let cutoff = now_unix.saturating_sub(window.as_secs());
        let mut total = 0u64;
        let mut successful = 0u64;
        for record in self.history.iter().rev() {
            if record.at_unix < cutoff {
                break;
            }
            total += 1;
            if record.success {
                successful += 1;
            }
        }
        if total == 0 {
            100.0
        } else {
            successful as f64 / total as f64 * 100.0
        }
    }

    pub fn uptime_last_hour(&self, now_unix: u64) -> f64 {
        self.uptime_over(now_unix, Duration::from_secs(HOUR))
    }

    pub fn uptime_last_day(&self, now_unix: u64) -> f64 {
        self.uptime_over(now_unix, Duration::from_secs(DAY))
    }

    pub fn uptime_last_week(&self, now_unix: u64) -> f64 {
        self.uptime_over(now_unix, Duration::from_secs(WEEK))
    }

    /// Classify the trend from the last 20 history entries (§4.6 step 8).
    pub fn trend(&self) -> Trend {
        let sample: Vec<&CheckRecord> = self.history.iter().rev().take(20).collect();
        if sample.len() < 10 {
            return Trend::Stable;
        }
        // `sample` is newest-first; restore chronological order before splitting in half.
        let chronological: Vec<&CheckRecord> = sample.into_iter().rev().collect();
        let mid = chronological.len() / 2;
        let (first_half, second_half) = chronological.split_at(mid);
        let rate = |half: &[&CheckRecord]| {
            let successes = half.iter().filter(|r| r.success).count();
            successes as f64 / half.len() as f64
        };
        let delta = rate(second_half) - rate(first_half);
        if delta > 0.1 {
            Trend::Improving
        } else if delta < -0.1 {
            Trend::Degrading
        } else {
            Trend::Stable
        }
    }

    /// Derived status: Down if currently failing, Up if currently succeeding,
    /// Unknown if never checked.
    pub fn current_status(&self) -> CurrentStatus {
        if self.consecutive_failures > 0 {
            CurrentStatus::Down
        } else if self.consecutive_successes > 0 {
            CurrentStatus::Up
        } else {
            CurrentStatus::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_start_single_success() {
        let mut stats = TargetStats::new(0);
        stats.record_check(0, true, Duration::from_millis(50), false);
        assert_eq!(stats.total_checks, 1);
        assert_eq!(stats.failed_checks, 0);
        assert_eq!(stats.current_status(), CurrentStatus::Up);
        assert_eq!(stats.overall_health(), 100.0);
        assert_eq!(stats.uptime_last_hour(0), 100.0);
    }

    #[test]
    fn failure_then_recovery_closes_downtime() {
        let mut stats = TargetStats::new(0);
        stats.record_check(0, false, Duration::from_millis(10), false);
        assert_eq!(stats.downtime_open_since, Some(0));
        assert_eq!(stats.current_status(), CurrentStatus::Down);

        stats.record_check(30, true, Duration::from_millis(10), false);
        assert_eq!(stats.downtime_open_since, None);
        assert_eq!(stats.last_downtime, Some(Duration::from_secs(30)));
        assert_eq!(stats.total_downtime, Duration::from_secs(30));
        assert_eq!(stats.current_status(), CurrentStatus::Up);
    }

    #[test]
    fn consecutive_counters_are_mutually_exclusive() {
        let mut stats = TargetStats::new(0);
        stats.record_check(0, true, Duration::from_millis(1), false);
        assert_eq!(stats.consecutive_failures, 0);
        assert_eq!(stats.consecutive_successes, 1);

        stats.record_check(1, false, Duration::from_millis(1), false);
        assert_eq!(stats.consecutive_failures, 1);
        assert_eq!(stats.consecutive_successes, 0);
    }

    #[test]
    fn history_evicts_oldest_past_cap() {
        let mut stats = TargetStats::new(0);
        for i in 0..HISTORY_CAP {
            stats.record_check(i as u64, true, Duration::from_millis(1), false);
        }
        assert_eq!(stats.history.len(), HISTORY_CAP);
        assert_eq!(stats.history.front().unwrap().at_unix, 0);

        stats.record_check(HISTORY_CAP as u64, true, Duration::from_millis(1), false);
        assert_eq!(stats.history.len(), HISTORY_CAP);
        assert_eq!(stats.history.front().unwrap().at_unix, 1);
    }

    #[test]
    fn response_ring_evicts_and_recomputes_mean() {
        let mut stats = TargetStats::new(0);
        for i in 0..RESPONSE_RING_CAP {
            stats.record_check(i as u64, true, Duration::from_millis(100), false);
        }
        assert_eq!(stats.response_times.len(), RESPONSE_RING_CAP);
        assert_eq!(stats.response_time_mean, Duration::from_millis(100));

        stats.record_check(RESPONSE_RING_CAP as u64, true, Duration::from_millis(200), false);
        assert_eq!(stats.response_times.len(), RESPONSE_RING_CAP);
        // one 100ms sample evicted, one 200ms sample added: mean ticks up.
        assert!(stats.response_time_mean > Duration::from_millis(100));
    }

    #[test]
    fn zero_duration_checks_are_not_added_to_response_ring() {
        let mut stats = TargetStats::new(0);
        stats.record_check(0, true, Duration::ZERO, false);
        assert!(stats.response_times.is_empty());
    }

    #[test]
    fn alert_sent_increments_emails_and_last_alert() {
        let mut stats = TargetStats::new(0);
        stats.record_check(100, false, Duration::from_millis(1), true);
        assert_eq!(stats.emails_sent, 1);
        assert_eq!(stats.last_alert, Some(100));
    }

    #[test]
    fn uptime_window_excludes_entries_before_cutoff() {
        let mut stats = TargetStats::new(0);
        stats.record_check(0, false, Duration::from_millis(1), false); // outside 1h window from t=10000
        stats.record_check(9_000, true, Duration::from_millis(1), false);
        assert_eq!(stats.uptime_last_hour(10_000), 100.0);
    }

    #[test]
    fn trend_is_stable_below_ten_entries() {
        let mut stats = TargetStats::new(0);
        for i in 0..9 {
            stats.record_check(i, false, Duration::from_millis(1), false);
        }
        assert_eq!(stats.trend(), Trend::Stable);
    }

    #[test]
    fn trend_improves_when_second_half_succeeds_more() {
        let mut stats = TargetStats::new(0);
        for i in 0..10 {
            stats.record_check(i, false, Duration::from_millis(1), false);
        }
        for i in 10..20 {
            stats.record_check(i, true, Duration::from_millis(1), false);
        }
        assert_eq!(stats.trend(), Trend::Improving);
    }

    #[test]
    fn trend_degrades_when_second_half_fails_more() {
        let mut stats = TargetStats::new(0);
        for i in 0..10 {
            stats.record_check(i, true, Duration::from_millis(1), false);
        }
        for i in 10..20 {
            stats.record_check(i, false, Duration::from_millis(1), false);
        }
        assert_eq!(stats.trend(), Trend::Degrading);
    }

    #[test]
    fn failed_never_exceeds_total_and_never_both_consecutive_nonzero() {
        let mut stats = TargetStats::new(0);
        let outcomes = [true, false, false, true, false, true, true];
        for (i, success) in outcomes.iter().enumerate() {
            stats.record_check(i as u64, *success, Duration::from_millis(1), false);
            assert!(stats.failed_checks <= stats.total_checks);
            assert!(stats.consecutive_failures <= stats.total_checks);
            if stats.total_checks > 0 {
                assert!(stats.consecutive_failures == 0 || stats.consecutive_successes == 0);
            }
        }
    }

    proptest::proptest! {
        /// §8: for all per-target stats, failed_checks <= total_checks and
        /// consecutive_failures <= total_checks, for any sequence of outcomes.
        #[test]
        fn prop_counters_stay_in_bounds(outcomes in proptest::collection::vec(proptest::bool::ANY, 0..200)) {
            let mut stats = TargetStats::new(0);
            for (i, success) in outcomes.iter().enumerate() {
                stats.record_check(i as u64, *success, Duration::from_millis(1), false);
                proptest::prop_assert!(stats.failed_checks <= stats.total_checks);
                proptest::prop_assert!(stats.consecutive_failures <= stats.total_checks);
            }
        }

        /// §8: overall_health = 100 * (total - failed) / total when total > 0.
        #[test]
        fn prop_overall_health_matches_formula(outcomes in proptest::collection::vec(proptest::bool::ANY, 1..200)) {
            let mut stats = TargetStats::new(0);
            for (i, success) in outcomes.iter().enumerate() {
                stats.record_check(i as u64, *success, Duration::from_millis(1), false);
            }
            let expected = (stats.total_checks - stats.failed_checks) as f64 / stats.total_checks as f64 * 100.0;
            proptest::prop_assert!((stats.overall_health() - expected).abs() < 1e-9);
        }
    }
}
