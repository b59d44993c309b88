//! Refresh-token sessions.

use sqlx::FromRow;
use sv_core::types::{DbId, Timestamp};

/// One issued refresh token. Rotation revokes the row and inserts a successor.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    /// SHA-256 hex of the token; the plaintext is never stored.
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for [`SessionRepo::open`](crate::repositories::SessionRepo::open) and
/// [`SessionRepo::rotate`](crate::repositories::SessionRepo::rotate).
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
}
