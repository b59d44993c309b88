//! Outbound email for ShareEase and Ventopia.
//!
//! - [`Mailer`] -- the handle shared through application state; wraps the
//!   configured [`MailTransport`].
//! - [`transport`] -- simulated (log-only), SMTP, and HTTP-API transports.
//! - [`templates`] -- the messages the applications send.

pub mod config;
pub mod error;
pub mod mailer;
pub mod message;
pub mod templates;
pub mod transport;

pub use config::{MailConfig, TransportKind};
pub use error::MailError;
pub use mailer::{DeliveryReceipt, Mailer};
pub use message::EmailMessage;
pub use transport::MailTransport;
