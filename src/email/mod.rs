//! Outbound email delivery abstractions.
//!
//! Verification mail is fire-and-forget: the workflow stores the code first
//! and then hands the message to an [`EmailSender`]. The sender decides how
//! to deliver (HTTP API, SMTP relay, etc.) and returns `Ok`/`Err`; a failed
//! send never invalidates the stored code.
//!
//! The default sender for local dev is [`LogEmailSender`], which logs and
//! returns `Ok(())`. [`HttpEmailSender`] posts the message as JSON to a
//! configured delivery endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

/// Email delivery abstraction used by the authentication workflow.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error to report the send as failed.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        info!(to_email = %to, subject = %subject, body = %body, "email send stub");

        Ok(())
    }
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Sender that delivers through an HTTP mail API.
#[derive(Clone, Debug)]
pub struct HttpEmailSender {
    client: reqwest::Client,
    endpoint: String,
    from: String,
}

impl HttpEmailSender {
    #[must_use]
    pub fn new(endpoint: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            from,
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = OutboundMessage {
            from: &self.from,
            to,
            subject,
            body,
        };

        self.client
            .post(&self.endpoint)
            .json(&message)
            .send()
            .await
            .context("failed to reach email delivery endpoint")?
            .error_for_status()
            .context("email delivery endpoint rejected the message")?;

        Ok(())
    }
}
