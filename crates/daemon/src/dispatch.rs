// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request dispatch (§4.10): turns one [`Request`] into one [`Response`],
//! routing every variant into a [`Handle`] method. No handler panics and
//! no handler blocks on anything but the `Handle`'s own locks and, for the
//! recording variants, the recorder's background task (§7: "A client
//! request never crashes the daemon — every handler returns a Response").

use beacon_core::Configuration;
use beacon_wire::{Request, Response};

use crate::handle::{Handle, HandleError};
use crate::views::{status_view, website_stats_view};

pub async fn dispatch(handle: &Handle, request: Request) -> Response {
    match request {
        Request::Ping => Response::ok_message("pong"),
        Request::Status => Response::ok_data(status_view(handle)),
        Request::Start => lifecycle_result(handle.start().await),
        Request::Stop => lifecycle_result(handle.stop().await),
        Request::Pause => lifecycle_result(handle.pause().await),
        Request::Resume => lifecycle_result(handle.resume().await),
        Request::SetConfig { email, websites, snapshot_ids } => {
            let config = Configuration { email, websites, snapshot_ids };
            lifecycle_result(handle.set_config(config))
        }
        Request::GetConfig => Response::ok_data(handle.config()),
        Request::GetLogs { lines } => Response::ok_data(handle.logs.get_last(lines)),
        Request::ClearLogs => {
            handle.logs.clear();
            Response::ok()
        }
        Request::GetStats => Response::ok_data(handle.aggregate_counters()),
        Request::GetWebsiteStats => {
            let now = handle.now_unix();
            let stats: Vec<_> = handle
                .all_target_stats()
                .iter()
                .map(|(url, stats)| website_stats_view(url, stats, now))
                .collect();
            Response::ok_data(stats)
        }
        Request::SetSmtp { host, port, username, password, from } => {
            match beacon_adapters::SmtpCredentials::new(host, port, username, password, from) {
                Ok(creds) => {
                    handle.set_smtp(creds);
                    Response::ok()
                }
                Err(e) => Response::error(e.to_string()),
            }
        }
        Request::GetSmtp => match handle.get_smtp() {
            Some(creds) => Response::ok_data(serde_json::json!({
                "host": creds.host,
                "port": creds.port,
                "username": creds.username,
                "from": creds.from,
            })),
            None => Response::error("SMTP is not configured"),
        },
    }
}

fn lifecycle_result(result: Result<(), HandleError>) -> Response {
    match result {
        Ok(()) => Response::ok(),
        Err(e) => Response::error(e.to_string()),
    }
}

/// Parse one line into a [`Request`], or build the `"unknown command: X"` /
/// malformed-JSON error response §4.10/§7 describe for the two failure
/// modes the wire format can hit.
pub fn parse_line(line: &str) -> Result<Request, Response> {
    beacon_wire::parse_request(line).map_err(|kind| {
        if kind == "malformed" {
            Response::error("malformed request")
        } else {
            Response::error(format!("unknown command: {kind}"))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_adapters::browser::FakeBrowser;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn handle(dir: &std::path::Path) -> Handle {
        Handle::with_browser(
            dir.to_path_buf(),
            crate::settings::DaemonSettings::default(),
            Some(Arc::new(FakeBrowser::new())),
        )
    }

    #[tokio::test]
    async fn ping_responds_pong() {
        let dir = tempdir().unwrap();
        let response = dispatch(&handle(dir.path()), Request::Ping).await;
        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("pong"));
    }

    #[tokio::test]
    async fn start_with_empty_config_is_an_error_response_not_a_crash() {
        let dir = tempdir().unwrap();
        let response = dispatch(&handle(dir.path()), Request::Start).await;
        assert!(!response.success);
    }

    #[tokio::test]
    async fn set_config_then_get_config_round_trips() {
        let dir = tempdir().unwrap();
        let handle = handle(dir.path());
        let set = Request::SetConfig {
            email: "a@b.c".into(),
            websites: vec!["https://x.test".into()],
            snapshot_ids: Default::default(),
        };
        assert!(dispatch(&handle, set).await.success);

        let response = dispatch(&handle, Request::GetConfig).await;
        let config: Configuration = serde_json::from_value(response.data.unwrap()).unwrap();
        assert_eq!(config.email, "a@b.c");
        assert_eq!(config.websites, vec!["https://x.test".to_string()]);
    }

    #[tokio::test]
    async fn unknown_command_reports_its_name() {
        let err = parse_line(r#"{"type":"FROBNICATE"}"#).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("unknown command: FROBNICATE"));
    }

    #[tokio::test]
    async fn clear_logs_then_get_logs_is_empty() {
        let dir = tempdir().unwrap();
        let handle = handle(dir.path());
        handle.logs.append("line one");
        assert!(dispatch(&handle, Request::ClearLogs).await.success);

        let response = dispatch(&handle, Request::GetLogs { lines: 100 }).await;
        let lines: Vec<String> = serde_json::from_value(response.data.unwrap()).unwrap();
        assert!(lines.is_empty());
    }
}
