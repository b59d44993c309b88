//! Accounts and public profiles (`users`).

use sqlx::PgPool;
use sv_core::roles::ROLE_USER;
use sv_core::types::DbId;

use crate::models::user::{CreateUser, UpdateProfile, User};

const COLUMNS: &str = "id, email, password_hash, display_name, bio, avatar_url, role, \
                       is_active, last_login_at, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Register an account. Emails are stored exactly as given, so callers
    /// normalize first; a second account with the same address trips
    /// `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, display_name, role) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.display_name)
        .bind(input.role.as_deref().unwrap_or(ROLE_USER))
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Used by login and by participant auto-linking.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Partial profile edit: `None` fields keep their stored value.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET display_name = COALESCE($2, display_name), \
                 bio = COALESCE($3, bio), \
                 avatar_url = COALESCE($4, avatar_url) \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(input.display_name.as_deref())
        .bind(input.bio.as_deref())
        .bind(input.avatar_url.as_deref())
        .fetch_optional(pool)
        .await
    }

    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map(|_| ())
    }
}
