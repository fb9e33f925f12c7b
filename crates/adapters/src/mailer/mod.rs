// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Email sink capability (§4.8).

mod lettre_mailer;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use lettre_mailer::LettreMailer;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMailer, SentMail};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted SMTP credentials for the email sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmtpCredentials {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("field `{0}` must not be empty")]
    Empty(&'static str),
    #[error("`from` address must contain '@'")]
    InvalidFrom,
}

impl SmtpCredentials {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let creds = Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            from: from.into(),
        };
        creds.validate()?;
        Ok(creds)
    }

    /// All fields non-empty, and `from` must contain '@' (§4.8: "validated
    /// on write"). The recipient's '@' is checked separately at send time
    /// since it isn't part of the stored credentials.
    fn validate(&self) -> Result<(), CredentialsError> {
        if self.host.is_empty() {
            return Err(CredentialsError::Empty("host"));
        }
        if self.username.is_empty() {
            return Err(CredentialsError::Empty("username"));
        }
        if self.password.is_empty() {
            return Err(CredentialsError::Empty("password"));
        }
        if self.from.is_empty() {
            return Err(CredentialsError::Empty("from"));
        }
        if !self.from.contains('@') {
            return Err(CredentialsError::InvalidFrom);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("SMTP is not configured")]
    NotConfigured,
    #[error("recipient `{0}` is not a valid address")]
    InvalidRecipient(String),
    #[error("failed to send: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_fields() {
        assert_eq!(
            SmtpCredentials::new("", 587, "u", "p", "a@b.c"),
            Err(CredentialsError::Empty("host"))
        );
        assert_eq!(
            SmtpCredentials::new("smtp.test", 587, "", "p", "a@b.c"),
            Err(CredentialsError::Empty("username"))
        );
    }

    #[test]
    fn rejects_from_without_at() {
        assert_eq!(
            SmtpCredentials::new("smtp.test", 587, "u", "p", "not-an-address"),
            Err(CredentialsError::InvalidFrom)
        );
    }

    #[test]
    fn accepts_well_formed_credentials() {
        assert!(SmtpCredentials::new("smtp.test", 587, "u", "p", "alerts@example.test").is_ok());
    }
}
