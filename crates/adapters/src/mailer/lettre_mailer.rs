// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SMTP implementation of [`Mailer`] built on lettre (§4.8).

use async_trait::async_trait;
use lettre::message::Message;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use super::{Mailer, MailerError, SmtpCredentials};

pub struct LettreMailer {
    credentials: Option<SmtpCredentials>,
}

impl LettreMailer {
    pub fn new(credentials: Option<SmtpCredentials>) -> Self {
        Self { credentials }
    }

    fn transport(
        &self,
        creds: &SmtpCredentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        let builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&creds.host)
            .map_err(|e| MailerError::Transport(e.to_string()))?
            .port(creds.port)
            .credentials(Credentials::new(creds.username.clone(), creds.password.clone()));
        Ok(builder.build())
    }
}

#[async_trait]
impl Mailer for LettreMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        let creds = self.credentials.as_ref().ok_or(MailerError::NotConfigured)?;
        if !to.contains('@') {
            return Err(MailerError::InvalidRecipient(to.to_string()));
        }

        let message = Message::builder()
            .from(creds.from.parse().map_err(|_| MailerError::InvalidRecipient(creds.from.clone()))?)
            .to(to.parse().map_err(|_| MailerError::InvalidRecipient(to.to_string()))?)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        let transport: AsyncSmtpTransport<Tokio1Executor> = self.transport(creds)?;
        transport.send(message).await.map_err(|e| MailerError::Transport(e.to_string()))?;
        Ok(())
    }
}
