// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy (§7). Every variant here either refuses a client request
//! with `Response::Error` or, for the handful that can occur before a
//! client even exists, aborts startup with a nonzero exit code (§6 CLI).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine a home directory to resolve the data directory")]
    NoDataDir,

    #[error("failed to create data directory: {0}")]
    CreateDataDir(#[source] std::io::Error),

    #[error("another beacond is already running against this data directory")]
    LockFailed(#[source] std::io::Error),

    #[error("failed to bind control socket on {0}: {1}")]
    Bind(std::net::SocketAddr, #[source] std::io::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors the daemon's own operations raise; always converted to
/// `Response::error(..)` at the protocol boundary (§7), never propagated as
/// a panic or connection drop.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("configuration is empty or absent")]
    ConfigAbsent,

    #[error("cannot {0} while {1}")]
    StateConflict(&'static str, &'static str),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("SMTP is not configured")]
    SmtpNotConfigured,

    #[error("{0}")]
    Other(String),
}
