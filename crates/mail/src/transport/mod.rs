//! Delivery backends behind the [`MailTransport`] trait.

pub mod http;
pub mod log;
pub mod smtp;

use async_trait::async_trait;

use crate::config::TransportKind;
use crate::error::MailError;
use crate::message::EmailMessage;

pub use http::HttpApiTransport;
pub use log::LogTransport;
pub use smtp::SmtpTransport;

/// A way of getting an [`EmailMessage`] to its recipient.
#[async_trait]
pub trait MailTransport: Send + Sync {
    fn kind(&self) -> TransportKind;

    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), MailError>;
}
