/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The HTTP email API could not be reached.
    #[error("Email API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The HTTP email API answered with a non-2xx status.
    #[error("Email API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The selected transport is missing required settings.
    #[error("Mail configuration error: {0}")]
    Config(String),
}
