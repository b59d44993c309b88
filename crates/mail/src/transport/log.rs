//! Simulated delivery: the message is written to the log and nothing leaves
//! the process. This is the default transport for development and tests.

use async_trait::async_trait;

use super::MailTransport;
use crate::config::TransportKind;
use crate::error::MailError;
use crate::message::EmailMessage;

#[derive(Debug, Default, Clone)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Log
    }

    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            from,
            to = %message.to,
            subject = %message.subject,
            body = %message.text_body,
            "Simulated email delivery"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_transport_always_succeeds() {
        let msg = EmailMessage::text("ana@example.com", "Hi", "Body");
        assert!(LogTransport.send("noreply@example.com", &msg).await.is_ok());
        assert_eq!(LogTransport.kind(), TransportKind::Log);
    }
}
