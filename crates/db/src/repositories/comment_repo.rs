//! Repository for the `comments` table.

use sqlx::PgPool;
use sv_core::types::DbId;

use crate::models::comment::{Comment, CommentWithAuthor};

const COLUMNS: &str = "id, event_id, author_id, body, created_at, updated_at";

pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        author_id: DbId,
        body: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (event_id, author_id, body) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(event_id)
            .bind(author_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Comments on an event with author names, oldest first.
    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.event_id, c.author_id, u.display_name AS author_name, c.body, c.created_at
             FROM comments c
             JOIN users u ON u.id = c.author_id
             WHERE c.event_id = $1
             ORDER BY c.created_at, c.id",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
