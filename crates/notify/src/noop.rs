//! No-op mail transport, used when SMTP is unconfigured.

use crate::traits::{Mailer, NotifyError, OutboundMail};

/// Drops every message, logging what would have been sent.
pub struct NoopMailer;

#[async_trait::async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError> {
        tracing::warn!(
            to = %mail.to,
            subject = %mail.subject,
            "SMTP not configured, dropping mail"
        );
        Ok(())
    }

    /// Returns `"noop"`.
    fn transport_name(&self) -> &str {
        "noop"
    }
}
