//! Repository for the `email_log` table.

use sqlx::PgPool;

use crate::models::email_log::{CreateEmailLog, EmailLogEntry};

const COLUMNS: &str = "id, recipient, subject, transport, status, error, created_at";

pub struct EmailLogRepo;

impl EmailLogRepo {
    pub async fn record(pool: &PgPool, input: &CreateEmailLog<'_>) -> Result<EmailLogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_log (recipient, subject, transport, status, error)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailLogEntry>(&query)
            .bind(input.recipient)
            .bind(input.subject)
            .bind(input.transport)
            .bind(input.status)
            .bind(input.error)
            .fetch_one(pool)
            .await
    }

    /// Most recent attempts for a recipient, newest first.
    pub async fn list_by_recipient(
        pool: &PgPool,
        recipient: &str,
    ) -> Result<Vec<EmailLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM email_log WHERE recipient = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, EmailLogEntry>(&query)
            .bind(recipient)
            .fetch_all(pool)
            .await
    }
}
