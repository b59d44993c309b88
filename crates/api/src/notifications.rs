//! Best-effort email notifications.
//!
//! Business handlers hand messages to [`deliver`] after their writes have
//! committed. Delivery failures are logged and recorded in `email_log`, never
//! returned to the caller.

use sv_db::models::email_log::{CreateEmailLog, EMAIL_STATUS_FAILED, EMAIL_STATUS_SENT};
use sv_db::repositories::EmailLogRepo;
use sv_mail::{DeliveryReceipt, EmailMessage, MailError};

use crate::state::AppState;

/// Send one message through the configured mailer and record the attempt.
pub async fn send_and_record(
    state: &AppState,
    message: &EmailMessage,
) -> Result<DeliveryReceipt, MailError> {
    let result = state.mailer.send(message).await;
    let transport = state.mailer.transport_kind().as_str();

    let error_text = result.as_ref().err().map(ToString::to_string);
    let entry = CreateEmailLog {
        recipient: &message.to,
        subject: &message.subject,
        transport,
        status: if result.is_ok() {
            EMAIL_STATUS_SENT
        } else {
            EMAIL_STATUS_FAILED
        },
        error: error_text.as_deref(),
    };
    if let Err(e) = EmailLogRepo::record(&state.pool, &entry).await {
        tracing::error!(error = %e, to = %message.to, "Failed to record email attempt");
    }

    result
}

/// Deliver every message, returning how many were accepted by the transport.
pub async fn deliver(state: &AppState, messages: Vec<EmailMessage>) -> usize {
    let mut sent = 0;
    for message in &messages {
        match send_and_record(state, message).await {
            Ok(_) => sent += 1,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    to = %message.to,
                    subject = %message.subject,
                    "Notification email not delivered"
                );
            }
        }
    }
    sent
}
