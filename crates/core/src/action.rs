// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded browser interaction actions (§3 snapshot schema).

use serde::{Deserialize, Serialize};

/// A single recorded interaction within a [`crate::Snapshot`].
///
/// Tagged by `type` in the on-disk JSON so the schema reads the same way
/// the control protocol's request/response types do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Navigate to a fresh URL.
    Navigate { url: String },

    /// Click an element, optionally disambiguated by text/aria-label/classes
    /// in case the selector alone matches more than one element.
    Click {
        selector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aria_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        classes: Option<String>,
    },

    /// Type a value into an input element.
    Input { selector: String, value: String },

    /// Send a single named key to an element.
    Keydown { selector: String, key: String },

    /// Press down the mouse button over an element (distinct from a full click).
    Mousedown { selector: String },

    /// Programmatic value change on an element.
    ///
    /// Preserved in the schema but never executed during replay (§4.4,
    /// §9) — custom form components were observed to hang when a `change`
    /// followed a synthetic `input`.
    Change { selector: String, value: String },
}

impl Action {
    /// The selector this action targets, if any (`navigate` has none).
    pub fn selector(&self) -> Option<&str> {
        match self {
            Action::Navigate { .. } => None,
            Action::Click { selector, .. }
            | Action::Input { selector, .. }
            | Action::Keydown { selector, .. }
            | Action::Mousedown { selector, .. }
            | Action::Change { selector, .. } => Some(selector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_round_trips() {
        let action = Action::Navigate { url: "https://example.test".into() };
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }

    #[test]
    fn click_with_hints_round_trips() {
        let action = Action::Click {
            selector: "#go".into(),
            text: Some("Go".into()),
            aria_label: None,
            classes: Some("btn btn-primary".into()),
        };
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }

    #[test]
    fn selector_is_none_for_navigate() {
        let action = Action::Navigate { url: "https://x.test".into() };
        assert_eq!(action.selector(), None);
    }

    #[test]
    fn selector_present_for_input() {
        let action = Action::Input { selector: "#q".into(), value: "abc".into() };
        assert_eq!(action.selector(), Some("#q"));
    }
}
