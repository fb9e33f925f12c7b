// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! beacon-adapters: capability traits for the two external systems the
//! monitoring daemon drives — a Chrome browser and an SMTP relay — plus
//! fake implementations for testing the engine and daemon crates without
//! either.

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

pub mod browser;
pub mod mailer;

pub use browser::{Browser, BrowserError, FailingRequest, RecordSignal, ReplayOutcome};
pub use mailer::{CredentialsError, Mailer, MailerError, SmtpCredentials};
