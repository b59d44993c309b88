//! Ventopia event and registration lifecycles.
//!
//! ```text
//! Event:         draft --publish--> published --cancel--> cancelled
//!                  ^                    |
//!                  +----unpublish-------+
//!                draft --cancel--> cancelled
//!
//! Registration:  pending --confirm--> confirmed
//!                pending | confirmed --cancel--> cancelled
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Event status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
}

/// A requested change to an event's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Publish,
    Unpublish,
    Cancel,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::Internal(format!(
                "Unknown event status '{other}'"
            ))),
        }
    }

    /// Apply `action`, returning the new status or a conflict.
    pub fn apply(self, action: EventAction) -> Result<Self, CoreError> {
        use EventAction::*;
        use EventStatus::*;

        match (self, action) {
            (Draft, Publish) => Ok(Published),
            (Published, Unpublish) => Ok(Draft),
            (Draft | Published, Cancel) => Ok(Cancelled),
            (from, action) => Err(CoreError::Conflict(format!(
                "Cannot {} an event that is {}",
                action.verb(),
                from.as_str()
            ))),
        }
    }

    /// Cancelled events are frozen.
    pub fn ensure_editable(self) -> Result<(), CoreError> {
        if self == Self::Cancelled {
            return Err(CoreError::Conflict(
                "Cancelled events can no longer be changed".into(),
            ));
        }
        Ok(())
    }

    /// Only published events take registrations.
    pub fn ensure_accepting_registrations(self) -> Result<(), CoreError> {
        if self != Self::Published {
            return Err(CoreError::Conflict(format!(
                "Event is {} and not accepting registrations",
                self.as_str()
            )));
        }
        Ok(())
    }
}

impl EventAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
            Self::Cancel => "cancel",
        }
    }
}

// ---------------------------------------------------------------------------
// Registration status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::Internal(format!(
                "Unknown registration status '{other}'"
            ))),
        }
    }

    pub fn confirm(self) -> Result<Self, CoreError> {
        match self {
            Self::Pending => Ok(Self::Confirmed),
            other => Err(CoreError::Conflict(format!(
                "Cannot confirm a registration that is {}",
                other.as_str()
            ))),
        }
    }

    pub fn cancel(self) -> Result<Self, CoreError> {
        match self {
            Self::Pending | Self::Confirmed => Ok(Self::Cancelled),
            Self::Cancelled => Err(CoreError::Conflict(
                "Registration is already cancelled".into(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduling and capacity
// ---------------------------------------------------------------------------

pub fn validate_schedule(starts_at: Timestamp, ends_at: Option<Timestamp>) -> Result<(), CoreError> {
    if let Some(ends_at) = ends_at {
        if ends_at <= starts_at {
            return Err(CoreError::Validation(
                "Event must end after it starts".into(),
            ));
        }
    }
    Ok(())
}

pub fn validate_capacity(capacity: Option<i32>) -> Result<(), CoreError> {
    match capacity {
        Some(c) if c < 1 => Err(CoreError::Validation(
            "Capacity must be at least 1 when set".into(),
        )),
        _ => Ok(()),
    }
}

/// Refuse another confirmation once `confirmed_count` reaches `capacity`.
/// `None` means unlimited.
pub fn check_capacity(capacity: Option<i32>, confirmed_count: i64) -> Result<(), CoreError> {
    match capacity {
        Some(cap) if confirmed_count >= i64::from(cap) => Err(CoreError::Conflict(format!(
            "Event is full ({confirmed_count}/{cap} confirmed)"
        ))),
        _ => Ok(()),
    }
}
