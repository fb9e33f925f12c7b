// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alert-log keys (§3, §4.2, glossary).
//!
//! A key is either a bare target URL (probe failures) or `snapshot_<id>`
//! (replay failures). Kept as a thin enum so callers can't accidentally use
//! a raw target URL where a snapshot key was intended, while the on-disk
//! and in-memory representation is a plain string.

use std::fmt;

use crate::snapshot::SnapshotId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertKey {
    Target(String),
    Snapshot(SnapshotId),
}

impl AlertKey {
    pub fn target(url: impl Into<String>) -> Self {
        Self::Target(url.into())
    }

    pub fn snapshot(id: SnapshotId) -> Self {
        Self::Snapshot(id)
    }

    pub fn as_string(&self) -> String {
        match self {
            AlertKey::Target(url) => url.clone(),
            AlertKey::Snapshot(id) => id.alert_key(),
        }
    }
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_key_is_the_bare_url() {
        let key = AlertKey::target("https://example.test");
        assert_eq!(key.as_string(), "https://example.test");
    }

    #[test]
    fn snapshot_key_is_prefixed() {
        let key = AlertKey::snapshot(SnapshotId::from_str("42"));
        assert_eq!(key.as_string(), "snapshot_42");
    }
}
