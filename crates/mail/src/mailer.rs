//! The application-facing mail handle.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{MailConfig, TransportKind};
use crate::error::MailError;
use crate::message::EmailMessage;
use crate::transport::{HttpApiTransport, LogTransport, MailTransport, SmtpTransport};

/// Confirmation that a transport accepted a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    pub transport: &'static str,
    pub recipient: String,
}

/// Cheaply cloneable handle over the configured [`MailTransport`].
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
    from_address: String,
}

impl Mailer {
    /// Build the transport selected by `config.transport`.
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        let transport: Arc<dyn MailTransport> = match config.transport {
            TransportKind::Log => Arc::new(LogTransport),
            TransportKind::Smtp => {
                let smtp = config.smtp.as_ref().ok_or_else(|| {
                    MailError::Config("SMTP transport selected without SMTP settings".into())
                })?;
                Arc::new(SmtpTransport::new(smtp)?)
            }
            TransportKind::Http => {
                let http = config.http.as_ref().ok_or_else(|| {
                    MailError::Config("HTTP transport selected without API settings".into())
                })?;
                Arc::new(HttpApiTransport::new(http)?)
            }
        };
        Ok(Self::with_transport(transport, &config.from_address))
    }

    pub fn with_transport(transport: Arc<dyn MailTransport>, from_address: &str) -> Self {
        Self {
            transport,
            from_address: from_address.to_string(),
        }
    }

    /// Log-only mailer from the default sender.
    pub fn simulated() -> Self {
        Self::with_transport(Arc::new(LogTransport), &MailConfig::default().from_address)
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    pub async fn send(&self, message: &EmailMessage) -> Result<DeliveryReceipt, MailError> {
        self.transport.send(&self.from_address, message).await?;
        tracing::debug!(
            to = %message.to,
            transport = self.transport.kind().as_str(),
            "Email accepted by transport"
        );
        Ok(DeliveryReceipt {
            transport: self.transport.kind().as_str(),
            recipient: message.to.clone(),
        })
    }
}
