//! SMTP mail transport via `lettre` with TLS support.
//!
//! Recipients vary per message (each settings field routes somewhere else),
//! so the transport is built once and addresses are parsed at send time.

use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use wartung_core::config::SmtpConfig;

use crate::traits::{Mailer, NotifyError, OutboundMail};

/// Sends mail through an SMTP relay.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build an `SmtpMailer` from SMTP configuration.
    ///
    /// Port 465 uses implicit TLS; other ports use STARTTLS when `tls` is
    /// set and a plain connection otherwise. SMTP credentials are resolved
    /// from the `SMTP_USERNAME` and `SMTP_PASSWORD` environment variables;
    /// if both are set they are passed to the transport, otherwise the
    /// connection is unauthenticated.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| NotifyError::Config("SMTP_HOST is not set".to_string()))?;

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Address(e.to_string()))?;

        let mut builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| NotifyError::Config(e.to_string()))?
                .port(config.port)
        } else if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| NotifyError::Config(e.to_string()))?
                .port(config.port)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(config.port)
        };

        // Attach credentials from environment if available.
        if let (Ok(username), Ok(password)) =
            (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD"))
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), NotifyError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Address(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&mail.subject)
            .body(mail.body.clone())
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        tracing::info!(
            transport = "smtp",
            to = %mail.to,
            subject = %mail.subject,
            "mail delivered"
        );

        Ok(())
    }

    /// Returns `"smtp"`.
    fn transport_name(&self) -> &str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: Option<&str>, port: u16, tls: bool, from: &str) -> SmtpConfig {
        SmtpConfig {
            host: host.map(String::from),
            port,
            tls,
            from: from.to_string(),
        }
    }

    #[test]
    fn parse_valid_email_address() {
        let mailbox: Result<Mailbox, _> = "alice@example.com".parse();
        assert!(mailbox.is_ok());
    }

    #[test]
    fn parse_email_with_display_name() {
        let mailbox: Result<Mailbox, _> = "Alice <alice@example.com>".parse();
        assert!(mailbox.is_ok());
        let mb = mailbox.unwrap();
        assert_eq!(mb.email.to_string(), "alice@example.com");
    }

    #[test]
    fn from_config_valid() {
        let mailer = SmtpMailer::from_config(&config(
            Some("smtp.example.com"),
            587,
            true,
            "wartung@example.com",
        ));
        assert!(mailer.is_ok());
    }

    #[test]
    fn from_config_missing_host() {
        let result = SmtpMailer::from_config(&config(None, 587, true, "wartung@example.com"));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("SMTP_HOST"), "got: {err}");
    }

    #[test]
    fn from_config_invalid_from_address() {
        let result =
            SmtpMailer::from_config(&config(Some("smtp.example.com"), 587, true, "bad-address"));
        assert!(matches!(result, Err(NotifyError::Address(_))));
    }

    #[test]
    fn from_config_implicit_tls_port() {
        let mailer = SmtpMailer::from_config(&config(
            Some("smtp.example.com"),
            465,
            true,
            "wartung@example.com",
        ));
        assert!(mailer.is_ok());
    }

    #[test]
    fn from_config_no_tls() {
        let mailer = SmtpMailer::from_config(&config(
            Some("localhost"),
            25,
            false,
            "wartung@example.com",
        ));
        assert!(mailer.is_ok());
    }

    #[test]
    fn transport_name_is_smtp() {
        let mailer = SmtpMailer::from_config(&config(
            Some("smtp.example.com"),
            587,
            true,
            "wartung@example.com",
        ))
        .unwrap();
        assert_eq!(mailer.transport_name(), "smtp");
    }

    #[tokio::test]
    async fn send_rejects_invalid_recipient() {
        let mailer = SmtpMailer::from_config(&config(
            Some("smtp.example.com"),
            587,
            true,
            "wartung@example.com",
        ))
        .unwrap();
        let result = mailer
            .send(&OutboundMail {
                to: "not-an-address".to_string(),
                subject: "x".to_string(),
                body: "y".to_string(),
            })
            .await;
        assert!(matches!(result, Err(NotifyError::Address(_))));
    }
}
