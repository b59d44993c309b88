//! Repository for the `participants` table.
//!
//! Every query is scoped by `owner_id`: a user only ever sees the contacts
//! they created.

use sqlx::PgPool;
use sv_core::types::DbId;

use crate::models::participant::{CreateParticipant, Participant, UpdateParticipant};

const COLUMNS: &str = "id, owner_id, name, email, phone, user_id, created_at, updated_at";

pub struct ParticipantRepo;

impl ParticipantRepo {
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateParticipant,
    ) -> Result<Participant, sqlx::Error> {
        let query = format!(
            "INSERT INTO participants (owner_id, name, email, phone, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_owned(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participants WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Participant>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Participant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participants WHERE owner_id = $1 ORDER BY name");
        sqlx::query_as::<_, Participant>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Count how many of `ids` belong to `owner_id`. Used to reject bills that
    /// reference someone else's contacts.
    pub async fn count_owned(pool: &PgPool, owner_id: DbId, ids: &[DbId]) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM participants WHERE owner_id = $1 AND id = ANY($2)",
        )
        .bind(owner_id)
        .bind(ids)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        input: &UpdateParticipant,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "UPDATE participants SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                user_id = COALESCE($6, user_id)
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a participant. Fails with a foreign-key violation while the
    /// participant still has shares on a bill.
    pub async fn delete(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM participants WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
