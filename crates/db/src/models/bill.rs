//! Bill and bill-participant models and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sv_core::settlement::ParticipantState;
use sv_core::types::{DbId, Money, Timestamp};

/// A row from the `bills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bill {
    pub id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub total_amount: Money,
    pub currency: String,
    pub category: String,
    pub split_type: String,
    pub is_completed: bool,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated input for inserting a bill. Built by the handler after the
/// split has been computed.
#[derive(Debug, Clone)]
pub struct CreateBill {
    pub creator_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub total_amount: Money,
    pub currency: String,
    pub category: String,
    pub split_type: String,
}

/// DTO for editing bill metadata. Amount and split go through `/split`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBill {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// A row from the `bill_participants` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BillParticipant {
    pub id: DbId,
    pub bill_id: DbId,
    pub participant_id: DbId,
    pub amount_owed: Money,
    pub percentage: Option<Decimal>,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub is_confirmed: bool,
    pub confirmed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A bill share joined with the participant's contact details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BillShareDetail {
    pub id: DbId,
    pub participant_id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub user_id: Option<DbId>,
    pub amount_owed: Money,
    pub percentage: Option<Decimal>,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub is_confirmed: bool,
    pub confirmed_at: Option<Timestamp>,
}

impl BillShareDetail {
    pub fn state(&self) -> ParticipantState {
        ParticipantState {
            amount_owed: self.amount_owed,
            is_paid: self.is_paid,
            is_confirmed: self.is_confirmed,
        }
    }
}

impl BillParticipant {
    pub fn state(&self) -> ParticipantState {
        ParticipantState {
            amount_owed: self.amount_owed,
            is_paid: self.is_paid,
            is_confirmed: self.is_confirmed,
        }
    }
}
