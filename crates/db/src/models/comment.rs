//! Event comment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sv_core::types::{DbId, Timestamp};

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub event_id: DbId,
    pub author_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment with its author's display name, for listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub event_id: DbId,
    pub author_id: DbId,
    pub author_name: String,
    pub body: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub body: String,
}
