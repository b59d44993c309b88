//! Delivery through a transactional-email HTTP API.
//!
//! Each message is a single `POST {base_url}/email` with a JSON body and the
//! API token in the `X-Api-Token` header. Any non-2xx answer is an error;
//! there is no retry.

use async_trait::async_trait;
use serde::Serialize;

use super::MailTransport;
use crate::config::{HttpApiConfig, TransportKind};
use crate::error::MailError;
use crate::message::EmailMessage;

pub const TOKEN_HEADER: &str = "X-Api-Token";

pub struct HttpApiTransport {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_body: Option<&'a str>,
}

impl HttpApiTransport {
    pub fn new(config: &HttpApiConfig) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/email", config.base_url),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for HttpApiTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), MailError> {
        let body = SendEmailRequest {
            from,
            to: &message.to,
            subject: &message.subject,
            text_body: &message.text_body,
            html_body: message.html_body.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(TOKEN_HEADER, &self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
