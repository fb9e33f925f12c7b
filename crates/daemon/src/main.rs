// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `beacond`: the monitoring daemon binary (§6 CLI, §4.9, §4.10).

use std::path::PathBuf;

use beacon_daemon::env::default_data_dir;
use beacon_daemon::listener;
use beacon_daemon::startup::startup;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Persistent website-monitoring daemon.
#[derive(Parser, Debug)]
#[command(name = "beacond", version)]
struct Cli {
    /// Data directory (defaults to $BEACON_DATA_DIR, $XDG_STATE_HOME/beacon, or ~/.apiwatcher)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Control-protocol TCP port (defaults to 9876, or the value saved in app-settings.json)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().or_else(|| default_data_dir().ok());
    let _log_guard = data_dir.as_ref().map(|dir| init_tracing(dir));
    if _log_guard.is_none() {
        init_tracing_stderr_only();
    }

    let started = match startup(data_dir, cli.port) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("beacond: fatal startup error: {e}");
            std::process::exit(1);
        }
    };

    let stop = CancellationToken::new();
    let ctrl_c = stop.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        ctrl_c.cancel();
    });

    if let Err(e) = listener::serve(started.handle, started.control_addr, stop).await {
        eprintln!("beacond: control socket error: {e}");
        std::process::exit(1);
    }
}

/// `logs/daemon.log` is optional (§6) — when the directory is writable,
/// mirror every `tracing` event there via a non-blocking appender in
/// addition to stderr; otherwise stderr alone still works.
fn init_tracing(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    let logs_dir = data_dir.join("logs");
    let _ = std::fs::create_dir_all(&logs_dir);
    let file_appender = tracing_appender::rolling::never(&logs_dir, "daemon.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .init();
    guard
}

fn init_tracing_stderr_only() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
