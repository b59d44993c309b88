//! Domain errors shared by the ShareEase and Ventopia services.
//!
//! Each variant maps to one HTTP status in the API crate; messages are
//! written for the end user and never carry SQL or internal detail.

use std::fmt;

use crate::types::DbId;

/// Kinds of record a lookup by numeric id can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Participant,
    Bill,
    BillShare,
    Event,
    Registration,
    Comment,
}

impl Entity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Participant => "Participant",
            Self::Bill => "Bill",
            Self::BillShare => "Bill share",
            Self::Event => "Event",
            Self::Registration => "Registration",
            Self::Comment => "Comment",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Missing, or hidden from the caller (invisible bills and drafts look
    /// missing rather than forbidden).
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: DbId },

    /// Rejected input: split arithmetic, amounts, schedules, field lengths.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The request is valid but the record's current state forbids it, e.g.
    /// a completed bill, a full event or a duplicate registration.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    /// Authenticated, allowed to see the record, not allowed to change it.
    #[error("Not permitted: {0}")]
    Forbidden(String),

    /// A stored value the domain cannot interpret, such as an unknown status.
    #[error("Internal error: {0}")]
    Internal(String),
}
