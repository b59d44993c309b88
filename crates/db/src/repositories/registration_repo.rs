//! Repository for the `registrations` table.

use sqlx::PgPool;
use sv_core::error::CoreError;
use sv_core::event_status::{check_capacity, RegistrationStatus};
use sv_core::types::DbId;

use crate::models::registration::Registration;
use crate::models::ticket::Ticket;
use crate::repositories::ticket_repo::COLUMNS as TICKET_COLUMNS;

const COLUMNS: &str =
    "id, event_id, user_id, attendee_name, attendee_email, status, created_at, updated_at";

/// Result of [`RegistrationRepo::confirm_with_ticket`].
#[derive(Debug)]
pub enum ConfirmOutcome {
    Confirmed {
        registration: Registration,
        ticket: Ticket,
    },
    /// Nothing was written; the error says why.
    Rejected(CoreError),
}

pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Insert a `pending` registration. A second registration with the same
    /// email for the same event violates `uq_registrations_event_email`.
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        user_id: Option<DbId>,
        attendee_name: &str,
        attendee_email: &str,
    ) -> Result<Registration, sqlx::Error> {
        let query = format!(
            "INSERT INTO registrations (event_id, user_id, attendee_name, attendee_email)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(event_id)
            .bind(user_id)
            .bind(attendee_name)
            .bind(attendee_email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registrations WHERE id = $1");
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<Registration>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM registrations WHERE event_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, Registration>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Registrations that still expect to attend (pending or confirmed).
    pub async fn list_active_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<Registration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM registrations
             WHERE event_id = $1 AND status <> 'cancelled'
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Compare-and-set status change; `None` if the row is no longer in `from`.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: RegistrationStatus,
        to: RegistrationStatus,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!(
            "UPDATE registrations SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Confirm a pending registration and issue its ticket in one transaction.
    ///
    /// The event row is locked while confirmed registrations are counted, so
    /// two concurrent confirmations cannot both take the last seat.
    pub async fn confirm_with_ticket(
        pool: &PgPool,
        registration_id: DbId,
        event_id: DbId,
        ticket_code: &str,
    ) -> Result<ConfirmOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let capacity: Option<i32> =
            sqlx::query_scalar("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_one(&mut *tx)
                .await?;

        let confirmed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = 'confirmed'",
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Err(err) = check_capacity(capacity, confirmed) {
            return Ok(ConfirmOutcome::Rejected(err));
        }

        let query = format!(
            "UPDATE registrations SET status = 'confirmed'
             WHERE id = $1 AND event_id = $2 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        let Some(registration) = sqlx::query_as::<_, Registration>(&query)
            .bind(registration_id)
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ConfirmOutcome::Rejected(CoreError::Conflict(
                "Registration is no longer pending".into(),
            )));
        };

        let query = format!(
            "INSERT INTO tickets (registration_id, code) VALUES ($1, $2) RETURNING {TICKET_COLUMNS}"
        );
        let ticket = sqlx::query_as::<_, Ticket>(&query)
            .bind(registration.id)
            .bind(ticket_code)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ConfirmOutcome::Confirmed {
            registration,
            ticket,
        })
    }
}
