//! Registration model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sv_core::error::CoreError;
use sv_core::event_status::RegistrationStatus;
use sv_core::types::{DbId, Timestamp};

/// A row from the `registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: Option<DbId>,
    pub attendee_name: String,
    pub attendee_email: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Registration {
    pub fn status(&self) -> Result<RegistrationStatus, CoreError> {
        RegistrationStatus::parse(&self.status)
    }
}

/// Body of `POST /events/{id}/registrations`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRegistration {
    pub attendee_name: String,
    pub attendee_email: String,
}
