// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridges the daemon's runtime-mutable SMTP credentials (set via
//! `SET_SMTP`, §4.10) to the fixed-at-construction [`Mailer`] capability
//! the scheduler is built with once at `Start`.

use async_trait::async_trait;
use beacon_adapters::{LettreMailer, Mailer, MailerError, SmtpCredentials};
use parking_lot::RwLock;
use std::sync::Arc;

/// Reads the current credentials on every send, so a `SET_SMTP` issued
/// while the daemon is stopped takes effect on the very next cycle without
/// requiring a scheduler restart.
pub struct HandleMailer {
    credentials: Arc<RwLock<Option<SmtpCredentials>>>,
}

impl HandleMailer {
    pub fn new(credentials: Arc<RwLock<Option<SmtpCredentials>>>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl Mailer for HandleMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        let creds = self.credentials.read().clone();
        LettreMailer::new(creds).send(to, subject, body).await
    }
}
