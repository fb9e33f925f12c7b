// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory bounded log ring (§4.7): every daemon log line is mirrored here
//! so control-protocol clients can fetch recent history without reading the
//! process log file.

use std::collections::VecDeque;

use parking_lot::Mutex;

pub const CAPACITY: usize = 1000;

/// Thread-safe bounded FIFO of formatted log lines.
#[derive(Default)]
pub struct LogRing {
    lines: Mutex<VecDeque<String>>,
}

impl LogRing {
    pub fn new() -> Self {
        Self { lines: Mutex::new(VecDeque::with_capacity(CAPACITY)) }
    }

    pub fn append(&self, line: impl Into<String>) {
        let mut lines = self.lines.lock();
        if lines.len() == CAPACITY {
            lines.pop_front();
        }
        lines.push_back(line.into());
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    /// The last `n` lines, oldest first.
    pub fn get_last(&self, n: usize) -> Vec<String> {
        let lines = self.lines.lock();
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_get_last_returns_in_order() {
        let ring = LogRing::new();
        ring.append("one");
        ring.append("two");
        ring.append("three");
        assert_eq!(ring.get_last(2), vec!["two", "three"]);
    }

    #[test]
    fn get_last_more_than_available_returns_all() {
        let ring = LogRing::new();
        ring.append("one");
        assert_eq!(ring.get_last(10), vec!["one"]);
    }

    #[test]
    fn clear_empties_the_ring() {
        let ring = LogRing::new();
        ring.append("one");
        ring.clear();
        assert!(ring.get_last(10).is_empty());
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let ring = LogRing::new();
        for i in 0..(CAPACITY + 10) {
            ring.append(format!("line-{i}"));
        }
        let last = ring.get_last(CAPACITY);
        assert_eq!(last.len(), CAPACITY);
        assert_eq!(last[0], "line-10");
        assert_eq!(last[last.len() - 1], format!("line-{}", CAPACITY + 9));
    }
}
