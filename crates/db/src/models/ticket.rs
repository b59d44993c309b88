//! Ticket model.

use serde::Serialize;
use sqlx::FromRow;
use sv_core::types::{DbId, Timestamp};

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub registration_id: DbId,
    pub code: String,
    pub issued_at: Timestamp,
    pub checked_in_at: Option<Timestamp>,
}

/// A ticket joined with its registration and event, as shown at the door.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketDetail {
    pub id: DbId,
    pub code: String,
    pub issued_at: Timestamp,
    pub checked_in_at: Option<Timestamp>,
    pub registration_id: DbId,
    pub attendee_name: String,
    pub attendee_email: String,
    pub registration_status: String,
    pub event_id: DbId,
    pub event_title: String,
    pub organizer_id: DbId,
    pub starts_at: Timestamp,
}
