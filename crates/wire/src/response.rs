// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response envelope (§4.10).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{success, message?, data?}` per §4.10. `data` is left as a loosely
/// typed [`Value`] because its shape depends on the request that produced
/// it (status, config, stats, a list of log lines, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn ok() -> Self {
        Self { success: true, message: None, data: None }
    }

    pub fn ok_message(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()), data: None }
    }

    pub fn ok_data(data: impl Serialize) -> Self {
        Self { success: true, message: None, data: serde_json::to_value(data).ok() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_omits_message_and_data() {
        let json = serde_json::to_string(&Response::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn error_carries_message() {
        let response = Response::error("unknown command: X");
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("unknown command: X"));
    }

    #[test]
    fn ok_data_serializes_the_payload() {
        let response = Response::ok_data(serde_json::json!({"a": 1}));
        assert_eq!(response.data, Some(serde_json::json!({"a": 1})));
    }
}
