//! Refresh-token sessions (`user_sessions`).
//!
//! Only the SHA-256 of a refresh token is ever stored. A session is live while
//! it is unrevoked and `expires_at` lies in the future.

use sqlx::PgPool;
use sv_core::types::DbId;

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                        user_agent, created_at, updated_at";

const INSERT: &str = "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at, user_agent) \
                      VALUES ($1, $2, $3, $4)";

pub struct SessionRepo;

impl SessionRepo {
    /// Open a session for a fresh login.
    pub async fn open(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(&format!("{INSERT} RETURNING {COLUMNS}"))
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }

    pub async fn find_live_by_hash(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(&format!(
            "SELECT {COLUMNS} FROM user_sessions \
             WHERE refresh_token_hash = $1 AND NOT is_revoked AND expires_at > NOW()"
        ))
        .bind(refresh_token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Swap session `previous` for a new one in a single transaction.
    ///
    /// `None` means `previous` had already been revoked, e.g. by a concurrent
    /// refresh presenting the same token; nothing is written in that case.
    pub async fn rotate(
        pool: &PgPool,
        previous: DbId,
        next: &CreateSession,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let revoked = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true \
             WHERE id = $1 AND user_id = $2 AND NOT is_revoked",
        )
        .bind(previous)
        .bind(next.user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if revoked == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let session = sqlx::query_as::<_, UserSession>(&format!("{INSERT} RETURNING {COLUMNS}"))
            .bind(next.user_id)
            .bind(&next.refresh_token_hash)
            .bind(next.expires_at)
            .bind(&next.user_agent)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(session))
    }

    /// Revoke every live session of a user (logout everywhere).
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        Ok(sqlx::query(
            "UPDATE user_sessions SET is_revoked = true WHERE user_id = $1 AND NOT is_revoked",
        )
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected())
    }
}
