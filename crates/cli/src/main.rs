// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `beaconctl`: the control-protocol client for `beacond` (§6).

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

mod client;
mod color;
mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use client::DaemonClient;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "beaconctl", version, styles = color::styles())]
struct Cli {
    /// Data directory the target beacond was started against
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Control-protocol port, overriding the daemon's saved app-settings.json
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show daemon lifecycle state and a summary
    Status,
    /// Start monitoring (requires a non-empty configuration)
    Start,
    /// Stop monitoring
    Stop,
    /// Pause monitoring without losing configuration
    Pause,
    /// Resume monitoring after a pause
    Resume,
    /// Read or replace the monitoring configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Read the in-memory log ring buffer
    Logs {
        /// Number of recent lines to show
        #[arg(short = 'n', long, default_value_t = 100)]
        lines: usize,
        /// Clear the buffer instead of reading it
        #[arg(long, conflicts_with = "lines")]
        clear: bool,
    },
    /// Per-target and aggregate statistics
    Stats,
    /// Read or set SMTP credentials for alert email
    #[command(subcommand)]
    Smtp(SmtpCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the current configuration
    Get,
    /// Replace the configuration (only while stopped)
    Set {
        /// Alert recipient address
        #[arg(long)]
        email: String,
        /// Website URLs to monitor, in cycle order
        #[arg(long = "website", required = true)]
        websites: Vec<String>,
    },
}

#[derive(Subcommand)]
enum SmtpCommand {
    /// Print whether SMTP is configured and its non-secret fields
    Get,
    /// Save SMTP credentials
    Set(SmtpSetArgs),
}

#[derive(Args)]
struct SmtpSetArgs {
    #[arg(long)]
    host: String,
    #[arg(long)]
    port: u16,
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    from: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = DaemonClient::resolve(cli.data_dir, cli.port)?;
    let format = cli.output;

    match cli.command {
        Command::Status => commands::status::status(&client, format).await,
        Command::Start => commands::lifecycle::start(&client).await,
        Command::Stop => commands::lifecycle::stop(&client).await,
        Command::Pause => commands::lifecycle::pause(&client).await,
        Command::Resume => commands::lifecycle::resume(&client).await,
        Command::Config(ConfigCommand::Get) => commands::config::get(&client, format).await,
        Command::Config(ConfigCommand::Set { email, websites }) => {
            commands::config::set(&client, email, websites).await
        }
        Command::Logs { lines, clear } => {
            if clear {
                commands::logs::clear(&client).await
            } else {
                commands::logs::logs(&client, lines, format).await
            }
        }
        Command::Stats => commands::stats::stats(&client, format).await,
        Command::Smtp(SmtpCommand::Get) => commands::smtp::get(&client, format).await,
        Command::Smtp(SmtpCommand::Set(args)) => {
            commands::smtp::set(&client, args.host, args.port, args.username, args.password, args.from).await
        }
    }
}
