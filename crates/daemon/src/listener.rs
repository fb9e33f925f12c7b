// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control-socket listener (§4.10, §5): a TCP accept loop where every
//! connection gets its own spawned task and, critically, its own
//! persistent [`tokio::io::BufReader`] for the connection's whole
//! lifetime — spec §9 calls out a bug class where a fresh buffered reader
//! per request silently drops bytes already read past a line boundary.

use std::net::SocketAddr;
use std::sync::Arc;

use beacon_wire::{read_line, write_response};
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dispatch::{dispatch, parse_line};
use crate::error::LifecycleError;
use crate::handle::Handle;

pub async fn serve(handle: Arc<Handle>, addr: SocketAddr, stop: CancellationToken) -> Result<(), LifecycleError> {
    let listener = TcpListener::bind(addr).await.map_err(|e| LifecycleError::Bind(addr, e))?;
    info!(%addr, "control socket listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!(error = %e, "failed to accept control connection");
                        continue;
                    }
                };
                let handle = handle.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(handle, stream).await {
                        warn!(%peer, error = %e, "control connection ended with an error");
                    }
                });
            }
            _ = stop.cancelled() => {
                info!("control socket shutting down");
                return Ok(());
            }
        }
    }
}

async fn handle_connection(handle: Arc<Handle>, stream: TcpStream) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    loop {
        let line = match read_line(&mut reader).await {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(()),
            Err(e) => return Err(std::io::Error::other(e)),
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match parse_line(&line) {
            Ok(request) => dispatch(&handle, request).await,
            Err(response) => response,
        };

        if let Err(e) = write_response(&mut write_half, &response).await {
            return Err(std::io::Error::other(e));
        }
    }
}
