//! Message templates for bill and event notifications.
//!
//! Each function returns a ready-to-send [`EmailMessage`]. Amounts and
//! dates arrive pre-formatted through `Display` so this crate stays free of
//! domain types.

use std::fmt::Display;

use crate::message::EmailMessage;

const SHAREEASE: &str = "ShareEase";
const VENTOPIA: &str = "Ventopia";

// ---------------------------------------------------------------------------
// ShareEase
// ---------------------------------------------------------------------------

/// Details of one participant's share, shared by the bill templates.
pub struct ShareNotice<'a> {
    pub participant_name: &'a str,
    pub bill_title: &'a str,
    pub amount: &'a dyn Display,
    pub currency: &'a str,
    pub bill_url: &'a str,
}

pub fn bill_invitation(to: &str, creator_name: &str, share: &ShareNotice<'_>) -> EmailMessage {
    let subject = format!("[{SHAREEASE}] You were added to \"{}\"", share.bill_title);
    let body = format!(
        "Hi {name},\n\n\
         {creator_name} added you to the bill \"{title}\".\n\
         Your share: {amount} {currency}\n\n\
         Review and confirm your share: {url}\n",
        name = share.participant_name,
        title = share.bill_title,
        amount = share.amount,
        currency = share.currency,
        url = share.bill_url,
    );
    EmailMessage::text(to, subject, body)
}

pub fn payment_reminder(to: &str, share: &ShareNotice<'_>) -> EmailMessage {
    let subject = format!("[{SHAREEASE}] Reminder: \"{}\" is unpaid", share.bill_title);
    let body = format!(
        "Hi {name},\n\n\
         This is a friendly reminder that your share of \"{title}\" is still open.\n\
         Amount due: {amount} {currency}\n\n\
         Details: {url}\n",
        name = share.participant_name,
        title = share.bill_title,
        amount = share.amount,
        currency = share.currency,
        url = share.bill_url,
    );
    EmailMessage::text(to, subject, body)
}

pub fn bill_completed(to: &str, participant_name: &str, bill_title: &str, bill_url: &str) -> EmailMessage {
    let subject = format!("[{SHAREEASE}] \"{bill_title}\" is settled");
    let body = format!(
        "Hi {participant_name},\n\n\
         The bill \"{bill_title}\" has been marked complete.\n\n\
         Summary: {bill_url}\n"
    );
    EmailMessage::text(to, subject, body)
}

// ---------------------------------------------------------------------------
// Ventopia
// ---------------------------------------------------------------------------

pub fn registration_received(
    to: &str,
    attendee_name: &str,
    event_title: &str,
    starts_at: &dyn Display,
) -> EmailMessage {
    let subject = format!("[{VENTOPIA}] Registration received: {event_title}");
    let body = format!(
        "Hi {attendee_name},\n\n\
         We received your registration for \"{event_title}\" on {starts_at}.\n\
         The organizer will confirm your spot shortly.\n"
    );
    EmailMessage::text(to, subject, body)
}

pub fn registration_confirmed(
    to: &str,
    attendee_name: &str,
    event_title: &str,
    starts_at: &dyn Display,
    location: Option<&str>,
    ticket_code: &str,
) -> EmailMessage {
    let subject = format!("[{VENTOPIA}] You're in: {event_title}");
    let where_line = location
        .map(|l| format!("Where: {l}\n"))
        .unwrap_or_default();
    let body = format!(
        "Hi {attendee_name},\n\n\
         Your spot at \"{event_title}\" is confirmed.\n\
         When: {starts_at}\n\
         {where_line}\
         Ticket code: {ticket_code}\n\n\
         Show this code at the door.\n"
    );
    let html = format!(
        "<p>Hi {attendee_name},</p>\
         <p>Your spot at <strong>{event_title}</strong> is confirmed.</p>\
         <p>Ticket code: <code>{ticket_code}</code></p>"
    );
    EmailMessage::text(to, subject, body).with_html(html)
}

pub fn event_cancelled(to: &str, attendee_name: &str, event_title: &str) -> EmailMessage {
    let subject = format!("[{VENTOPIA}] Cancelled: {event_title}");
    let body = format!(
        "Hi {attendee_name},\n\n\
         Unfortunately \"{event_title}\" has been cancelled by the organizer.\n"
    );
    EmailMessage::text(to, subject, body)
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

pub fn test_email(to: &str, transport: &str) -> EmailMessage {
    EmailMessage::text(
        to,
        "Test email",
        format!("This is a test message delivered through the '{transport}' transport.\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share<'a>(amount: &'a dyn Display) -> ShareNotice<'a> {
        ShareNotice {
            participant_name: "Ana",
            bill_title: "Dinner",
            amount,
            currency: "USD",
            bill_url: "http://localhost:5173/bills/7",
        }
    }

    #[test]
    fn invitation_mentions_amount_and_creator() {
        let amount = "25.00";
        let msg = bill_invitation("ana@example.com", "Ben", &share(&amount));
        assert_eq!(msg.to, "ana@example.com");
        assert!(msg.subject.contains("Dinner"));
        assert!(msg.text_body.contains("Ben added you"));
        assert!(msg.text_body.contains("25.00 USD"));
        assert!(msg.text_body.contains("/bills/7"));
    }

    #[test]
    fn reminder_subject() {
        let amount = "10.00";
        let msg = payment_reminder("ana@example.com", &share(&amount));
        assert!(msg.subject.starts_with("[ShareEase] Reminder"));
    }

    #[test]
    fn confirmation_has_ticket_code_and_html() {
        let when = "2026-11-01 18:00 UTC";
        let msg = registration_confirmed(
            "ana@example.com",
            "Ana",
            "Swing Night",
            &when,
            Some("Main Hall"),
            "VT-ABCDEF123456",
        );
        assert!(msg.text_body.contains("VT-ABCDEF123456"));
        assert!(msg.text_body.contains("Where: Main Hall"));
        assert!(msg.html_body.unwrap().contains("VT-ABCDEF123456"));
    }

    #[test]
    fn confirmation_without_location_skips_line() {
        let when = "soon";
        let msg = registration_confirmed("a@b.co", "Ana", "Gig", &when, None, "VT-000000000000");
        assert!(!msg.text_body.contains("Where:"));
    }

    #[test]
    fn test_email_names_transport() {
        let msg = test_email("ops@example.com", "smtp");
        assert!(msg.text_body.contains("'smtp'"));
    }
}
