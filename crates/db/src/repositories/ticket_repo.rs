//! Repository for the `tickets` table.

use sqlx::PgPool;

use crate::models::ticket::{Ticket, TicketDetail};

pub(crate) const COLUMNS: &str = "id, registration_id, code, issued_at, checked_in_at";

const DETAIL_SELECT: &str = "SELECT t.id, t.code, t.issued_at, t.checked_in_at, \
                             r.id AS registration_id, r.attendee_name, r.attendee_email, \
                             r.status AS registration_status, \
                             e.id AS event_id, e.title AS event_title, e.organizer_id, e.starts_at \
                             FROM tickets t \
                             JOIN registrations r ON r.id = t.registration_id \
                             JOIN events e ON e.id = r.event_id";

pub struct TicketRepo;

impl TicketRepo {
    pub async fn find_detail_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<TicketDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE t.code = $1");
        sqlx::query_as::<_, TicketDetail>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `checked_in_at`. Returns `None` if the ticket was already used.
    pub async fn check_in(pool: &PgPool, code: &str) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET checked_in_at = NOW()
             WHERE code = $1 AND checked_in_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }
}
