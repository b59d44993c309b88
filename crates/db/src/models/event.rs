//! Event model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sv_core::event_status::EventStatus;
use sv_core::error::CoreError;
use sv_core::types::{DbId, Money, Timestamp};

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub organizer_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<i32>,
    pub ticket_price: Money,
    pub currency: String,
    pub status: String,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    pub fn status(&self) -> Result<EventStatus, CoreError> {
        EventStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<i32>,
    pub ticket_price: Option<Money>,
    pub currency: Option<String>,
}

/// DTO for updating an event. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<i32>,
    pub ticket_price: Option<Money>,
    pub currency: Option<String>,
}
