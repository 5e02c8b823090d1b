//! Email delivery behind a provider trait.
//!
//! Production uses [`HttpEmailSender`] against an external email API;
//! development falls back to [`ConsoleEmailSender`], which only logs.

use std::future::Future;

use serde::Serialize;

use crate::error::{CoreError, Result};

/// Sends transactional email (OTP codes, booking and payment confirmations).
pub trait EmailSender: Send + Sync {
    /// Delivers one email to `to`, addressed to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmailDelivery`] when the message could not be
    /// handed off to the provider.
    fn send_email(
        &self,
        to: &str,
        name: &str,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Sends one email on a detached task, logging (not surfacing) failures.
///
/// Used for fire-and-forget notifications: OTP codes and booking/payment
/// confirmations must never fail the request that triggered them.
pub fn send_detached<E>(sender: E, to: String, name: String, subject: String, body: String)
where
    E: EmailSender + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = sender.send_email(&to, &name, &subject, &body).await {
            tracing::warn!(error = %err, to, subject, "email delivery failed");
        }
    });
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    to: &'a str,
    name: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Delivers email by POSTing JSON to an external email API.
#[derive(Debug, Clone)]
pub struct HttpEmailSender {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpEmailSender {
    /// Creates a sender targeting `api_url`, authenticating with `api_key`
    /// via the `x-api-key` header.
    #[must_use]
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl EmailSender for HttpEmailSender {
    fn send_email(
        &self,
        to: &str,
        name: &str,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<()>> + Send {
        let request = self
            .client
            .post(self.api_url.as_str())
            .header("x-api-key", self.api_key.as_str())
            .json(&EmailPayload {
                to,
                name,
                subject,
                body,
            });
        async move {
            let response = request
                .send()
                .await
                .map_err(|err| CoreError::EmailDelivery(err.to_string()))?;
            if response.status().is_success() {
                Ok(())
            } else {
                Err(CoreError::EmailDelivery(format!(
                    "email API returned {}",
                    response.status()
                )))
            }
        }
    }
}

/// Logs email instead of sending it. For local development.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEmailSender;

impl ConsoleEmailSender {
    /// Creates a console sender.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EmailSender for ConsoleEmailSender {
    fn send_email(
        &self,
        to: &str,
        name: &str,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<()>> + Send {
        tracing::info!(to, name, subject, body, "email (console sender)");
        async { Ok(()) }
    }
}
