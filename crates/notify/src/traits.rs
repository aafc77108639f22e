//! Mailer trait definition and shared error types.

/// Errors that can occur during mail delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("invalid address: {0}")]
    Address(String),

    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// A fully addressed message ready for delivery.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait for mail transport implementations.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message through this transport. Fire-and-forget from the
    /// caller's perspective; no delivery confirmation beyond the SMTP
    /// handshake.
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError>;

    /// Send a sample message to the given recipient, for verifying the
    /// transport from the settings screen.
    async fn test(&self, to: &str) -> Result<(), NotifyError> {
        self.send(&OutboundMail {
            to: to.to_string(),
            subject: "[TEST] wartung mail transport".to_string(),
            body: "This is a test message from the wartung update-maintenance service."
                .to_string(),
        })
        .await
    }

    /// Human-readable name for this transport (e.g. "smtp", "noop").
    fn transport_name(&self) -> &str;
}
