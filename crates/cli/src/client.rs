// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DaemonClient`: a thin TCP client over the control protocol (§4.10,
//! §6), one request per connection's first line, exactly mirroring the
//! framing `beacon-daemon::listener` expects on the server side.

use std::net::SocketAddr;
use std::path::PathBuf;

use beacon_daemon::env::default_data_dir;
use beacon_daemon::settings::{app_settings_path, DaemonSettings};
use beacon_wire::{Request, Response};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to beacond on {0}: {1}")]
    Connect(SocketAddr, #[source] std::io::Error),
    #[error("io error talking to beacond: {0}")]
    Io(#[from] std::io::Error),
    #[error("beacond closed the connection without a response")]
    NoResponse,
    #[error("beacond sent a response we could not parse: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}

impl ClientError {
    /// True when the daemon is simply not listening — the caller should
    /// print "not running" instead of a raw connection error.
    pub fn is_not_running(&self) -> bool {
        matches!(self, ClientError::Connect(_, e) if e.kind() == std::io::ErrorKind::ConnectionRefused)
    }
}

pub struct DaemonClient {
    addr: SocketAddr,
}

impl DaemonClient {
    /// Resolve the control address the same way `beacond` resolves its
    /// listen address: `data_dir`/`app-settings.json`'s `control_port` on
    /// localhost, falling back to [`DEFAULT_CONTROL_PORT`] if the daemon has
    /// never been started against this data directory.
    pub fn resolve(data_dir: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<Self> {
        let port = match port {
            Some(p) => p,
            None => {
                let data_dir = match data_dir {
                    Some(dir) => dir,
                    None => default_data_dir()?,
                };
                let settings = DaemonSettings::load(&app_settings_path(&data_dir));
                settings.control_port
            }
        };
        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        Ok(Self { addr })
    }

    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let stream = TcpStream::connect(self.addr)
            .await
            .map_err(|e| ClientError::Connect(self.addr, e))?;
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let mut line = serde_json::to_vec(request)?;
        line.push(b'\n');
        write_half.write_all(&line).await?;
        write_half.flush().await?;

        let mut response_line = String::new();
        let bytes_read = reader.read_line(&mut response_line).await?;
        if bytes_read == 0 {
            return Err(ClientError::NoResponse);
        }
        let response: Response = serde_json::from_str(response_line.trim_end())?;
        if !response.success {
            return Err(ClientError::Rejected(
                response.message.unwrap_or_else(|| "request rejected".to_string()),
            ));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_adapters::browser::FakeBrowser;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn ping_round_trips_through_a_real_socket() {
        let dir = tempdir().unwrap();
        let handle = Arc::new(beacon_daemon::Handle::with_browser(
            dir.path().to_path_buf(),
            DaemonSettings::default(),
            Some(Arc::new(FakeBrowser::new())),
        ));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let stop = CancellationToken::new();
        let stop_clone = stop.clone();
        tokio::spawn(async move {
            let _ = beacon_daemon::listener::serve(handle, addr, stop_clone).await;
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let client = DaemonClient { addr };
        let response = client.send(&Request::Ping).await.unwrap();
        assert_eq!(response.message.as_deref(), Some("pong"));
        stop.cancel();
    }

    #[tokio::test]
    async fn connecting_to_a_closed_port_is_reported_as_not_running() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = DaemonClient { addr };
        let err = client.send(&Request::Ping).await.unwrap_err();
        assert!(err.is_not_running());
    }
}
