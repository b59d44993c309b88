//! Repository for the `events` table.

use sqlx::PgPool;
use sv_core::event_status::EventStatus;
use sv_core::types::{DbId, Money};

use crate::models::event::{CreateEvent, Event, UpdateEvent};

const COLUMNS: &str = "id, organizer_id, title, description, location, starts_at, ends_at, \
                       capacity, ticket_price, currency, status, published_at, created_at, updated_at";

pub struct EventRepo;

impl EventRepo {
    /// Insert a new event in `draft` status.
    ///
    /// `currency` and `ticket_price` are the handler-normalized values.
    pub async fn create(
        pool: &PgPool,
        organizer_id: DbId,
        input: &CreateEvent,
        ticket_price: Money,
        currency: &str,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (organizer_id, title, description, location, starts_at, ends_at, capacity,
                 ticket_price, currency)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(organizer_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.capacity)
            .bind(ticket_price)
            .bind(currency)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Published events, soonest first.
    pub async fn list_published(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE status = 'published'
             ORDER BY starts_at ASC, id ASC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every event the user organizes, any status, soonest first.
    pub async fn list_by_organizer(
        pool: &PgPool,
        organizer_id: DbId,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE organizer_id = $1 ORDER BY starts_at ASC, id ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(organizer_id)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    ///
    /// Cancelled events are frozen: `None` if the event is missing or was
    /// cancelled after the caller loaded it.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                starts_at = COALESCE($5, starts_at),
                ends_at = COALESCE($6, ends_at),
                capacity = COALESCE($7, capacity),
                ticket_price = COALESCE($8, ticket_price),
                currency = COALESCE($9, currency)
             WHERE id = $1 AND status <> 'cancelled'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.capacity)
            .bind(input.ticket_price)
            .bind(&input.currency)
            .fetch_optional(pool)
            .await
    }

    /// Move an event from `from` to `to`. The `from` guard makes the
    /// transition a compare-and-set; returns `None` if the status changed
    /// underneath us. `published_at` is stamped on first publish.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: EventStatus,
        to: EventStatus,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                status = $3,
                published_at = CASE WHEN $3 = 'published' THEN COALESCE(published_at, NOW())
                                    ELSE published_at END
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
