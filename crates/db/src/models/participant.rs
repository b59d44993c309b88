//! Participant (bill contact) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sv_core::types::{DbId, Timestamp};

/// A row from the `participants` table.
///
/// Participants belong to the user who created them (`owner_id`) and may be
/// linked to a registered account through `user_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participant {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateParticipant {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_id: Option<DbId>,
}

/// DTO for updating a participant. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateParticipant {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub user_id: Option<DbId>,
}
