// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`Mailer`] double for daemon-crate tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Mailer, MailerError};

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail_with: Mutex<Option<String>>,
}

impl FakeMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(msg: impl Into<String>) -> Self {
        let mailer = Self::new();
        *mailer.fail_with.lock() = Some(msg.into());
        mailer
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        if let Some(msg) = self.fail_with.lock().clone() {
            return Err(MailerError::Transport(msg));
        }
        self.sent.lock().push(SentMail { to: to.to_string(), subject: subject.to_string(), body: body.to_string() });
        Ok(())
    }
}
