// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Outgoing mail.
//!
//! Production mail goes through an authenticated SMTP relay. Without a relay
//! configured, messages are kept in an in-process outbox and logged, which is
//! what local development and the tests use.

use std::sync::{Arc, Mutex};

use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::error::{AppError, Result};

/// Subject line of the password reset mail.
pub const RESET_SUBJECT: &str = "link to reset your password";

/// A message as handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone)]
enum Transport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Outbox(Arc<Mutex<Vec<OutgoingMail>>>),
}

/// Mail sender with a fixed from-address.
#[derive(Clone)]
pub struct Mailer {
    from: String,
    transport: Transport,
}

impl Mailer {
    /// Build the mailer described by the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let Some(smtp) = &config.smtp else {
            tracing::warn!("SMTP_HOST not set, outgoing mail is only logged");
            return Ok(Self::outbox(&config.mail_from));
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .map_err(|e| AppError::Mail(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        tracing::info!(host = %smtp.host, "SMTP relay configured");

        Ok(Self {
            from: config.mail_from.clone(),
            transport: Transport::Smtp(transport),
        })
    }

    /// Mailer that records messages instead of sending them.
    pub fn outbox(from: &str) -> Self {
        Self {
            from: from.to_string(),
            transport: Transport::Outbox(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Messages recorded by an outbox mailer, oldest first.
    pub fn sent(&self) -> Vec<OutgoingMail> {
        match &self.transport {
            Transport::Outbox(outbox) => outbox.lock().map(|m| m.clone()).unwrap_or_default(),
            Transport::Smtp(_) => Vec::new(),
        }
    }

    pub async fn send(&self, mail: OutgoingMail) -> Result<()> {
        match &self.transport {
            Transport::Outbox(outbox) => {
                tracing::info!(
                    to = %mail.to,
                    subject = %mail.subject,
                    body = %mail.body,
                    "Mail queued in outbox"
                );
                outbox
                    .lock()
                    .map_err(|_| AppError::Mail("outbox lock poisoned".to_string()))?
                    .push(mail);
                Ok(())
            }
            Transport::Smtp(transport) => {
                let message = self.build_message(&mail)?;
                transport
                    .send(message)
                    .await
                    .map_err(|e| AppError::Mail(e.to_string()))?;
                tracing::info!(to = %mail.to, subject = %mail.subject, "Mail sent");
                Ok(())
            }
        }
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid from address: {}", e)))?;
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid to address: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| AppError::Mail(format!("Failed to create email: {}", e)))
    }

    /// Send the single-use reset link to `to`.
    pub async fn send_reset_link(&self, to: &str, link: &str) -> Result<()> {
        self.send(OutgoingMail {
            to: to.to_string(),
            subject: RESET_SUBJECT.to_string(),
            body: format!("click on this link to reset your password : {}", link),
        })
        .await
    }
}
