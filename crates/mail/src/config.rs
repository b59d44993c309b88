//! Mail transport configuration.

use std::time::Duration;

use crate::error::MailError;

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `MAIL_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@shareease.local";

/// Default timeout for a single HTTP API call.
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Which transport delivers mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Simulated delivery: messages are written to the log only.
    Log,
    Smtp,
    Http,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Smtp => "smtp",
            Self::Http => "http",
        }
    }

    pub fn parse(s: &str) -> Result<Self, MailError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" | "" => Ok(Self::Log),
            "smtp" => Ok(Self::Smtp),
            "http" => Ok(Self::Http),
            other => Err(MailError::Config(format!(
                "Unknown MAIL_TRANSPORT '{other}'. Valid: log, smtp, http"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpApiConfig {
    /// Base URL of the transactional-email API; messages go to `{base_url}/email`.
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

/// Configuration for outbound mail.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub transport: TransportKind,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp: Option<SmtpConfig>,
    pub http: Option<HttpApiConfig>,
}

impl Default for MailConfig {
    /// Log-only delivery from the default sender.
    fn default() -> Self {
        Self {
            transport: TransportKind::Log,
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            smtp: None,
            http: None,
        }
    }
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                | Required            | Default                    |
    /// |-------------------------|---------------------|----------------------------|
    /// | `MAIL_TRANSPORT`        | no                  | `log`                      |
    /// | `MAIL_FROM`             | no                  | `noreply@shareease.local`  |
    /// | `SMTP_HOST`             | for `smtp`          | --                         |
    /// | `SMTP_PORT`             | no                  | `587`                      |
    /// | `SMTP_USER`             | no                  | --                         |
    /// | `SMTP_PASSWORD`         | no                  | --                         |
    /// | `MAIL_API_URL`          | for `http`          | --                         |
    /// | `MAIL_API_TOKEN`        | for `http`          | --                         |
    /// | `MAIL_API_TIMEOUT_SECS` | no                  | `10`                       |
    pub fn from_env() -> Result<Self, MailError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MailError> {
        let transport = match lookup("MAIL_TRANSPORT") {
            Some(v) => TransportKind::parse(&v)?,
            None => TransportKind::Log,
        };
        let from_address =
            lookup("MAIL_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string());

        let smtp = lookup("SMTP_HOST").map(|host| SmtpConfig {
            host,
            port: lookup("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user: lookup("SMTP_USER"),
            password: lookup("SMTP_PASSWORD"),
        });

        let http = match (lookup("MAIL_API_URL"), lookup("MAIL_API_TOKEN")) {
            (Some(base_url), Some(token)) => Some(HttpApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                token,
                timeout: Duration::from_secs(
                    lookup("MAIL_API_TIMEOUT_SECS")
                        .and_then(|t| t.parse().ok())
                        .unwrap_or(DEFAULT_API_TIMEOUT_SECS),
                ),
            }),
            _ => None,
        };

        match transport {
            TransportKind::Smtp if smtp.is_none() => Err(MailError::Config(
                "MAIL_TRANSPORT=smtp requires SMTP_HOST".into(),
            )),
            TransportKind::Http if http.is_none() => Err(MailError::Config(
                "MAIL_TRANSPORT=http requires MAIL_API_URL and MAIL_API_TOKEN".into(),
            )),
            _ => Ok(Self {
                transport,
                from_address,
                smtp,
                http,
            }),
        }
    }
}
