//! SMTP delivery via `lettre`'s async STARTTLS relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::MailTransport;
use crate::config::{SmtpConfig, TransportKind};
use crate::error::MailError;
use crate::message::EmailMessage;

pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Build the relay. No connection is opened until the first send.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port);

        if let (Some(user), Some(pass)) = (&config.user, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
        })
    }
}

/// Assemble the MIME message: plain text, or text+HTML alternatives.
pub(crate) fn build_message(from: &str, message: &EmailMessage) -> Result<Message, MailError> {
    let builder = Message::builder()
        .from(from.parse()?)
        .to(message.to.parse()?)
        .subject(message.subject.clone());

    let built = match &message.html_body {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            message.text_body.clone(),
            html.clone(),
        )),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(message.text_body.clone()),
    };
    built.map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Smtp
    }

    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), MailError> {
        let email = build_message(from, message)?;
        self.mailer.send(email).await?;
        Ok(())
    }
}
