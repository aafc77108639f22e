//! Mail dispatch for wartung.
//!
//! This crate provides:
//! - `Mailer` trait for pluggable mail transports
//! - SMTP transport via `lettre`
//! - A no-op transport used when SMTP is unconfigured
//! - Minijinja rendering for mail bodies and error pages

pub mod email;
pub mod noop;
pub mod templating;
pub mod traits;

pub use email::SmtpMailer;
pub use noop::NoopMailer;
pub use templating::TemplateRenderer;
pub use traits::{Mailer, NotifyError, OutboundMail};
