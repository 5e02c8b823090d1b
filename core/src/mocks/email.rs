//! Recording email sender for tests.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{CoreError, Result};
use crate::providers::EmailSender;

/// One recorded email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub to: String,
    /// Recipient display name.
    pub name: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
}

/// Records email instead of delivering it. Cloning shares the recording.
#[derive(Debug, Clone, Default)]
pub struct MockEmailSender {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail: bool,
}

impl MockEmailSender {
    /// A sender that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender that rejects everything with a delivery error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// Everything recorded so far, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EmailSender for MockEmailSender {
    fn send_email(
        &self,
        to: &str,
        name: &str,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<()>> + Send {
        let result = if self.fail {
            Err(CoreError::EmailDelivery("injected failure".to_string()))
        } else {
            self.sent
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(SentEmail {
                    to: to.to_string(),
                    name: name.to_string(),
                    subject: subject.to_string(),
                    body: body.to_string(),
                });
            Ok(())
        };
        async move { result }
    }
}
