//! Repository for the `bill_participants` join table.

use sqlx::PgPool;
use sv_core::types::DbId;

use crate::models::bill::{BillParticipant, BillShareDetail};

pub(crate) const COLUMNS: &str = "id, bill_id, participant_id, amount_owed, percentage, is_paid, \
                                  paid_at, is_confirmed, confirmed_at, created_at, updated_at";

const DETAIL_SELECT: &str = "SELECT bp.id, bp.participant_id, p.name, p.email, p.user_id, \
                             bp.amount_owed, bp.percentage, bp.is_paid, bp.paid_at, \
                             bp.is_confirmed, bp.confirmed_at \
                             FROM bill_participants bp \
                             JOIN participants p ON p.id = bp.participant_id";

pub struct BillParticipantRepo;

impl BillParticipantRepo {
    /// All shares of a bill with contact details, in insertion order.
    pub async fn list_details(
        pool: &PgPool,
        bill_id: DbId,
    ) -> Result<Vec<BillShareDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE bp.bill_id = $1 ORDER BY bp.id");
        sqlx::query_as::<_, BillShareDetail>(&query)
            .bind(bill_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        bill_id: DbId,
        participant_id: DbId,
    ) -> Result<Option<BillShareDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE bp.bill_id = $1 AND bp.participant_id = $2");
        sqlx::query_as::<_, BillShareDetail>(&query)
            .bind(bill_id)
            .bind(participant_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `user_id` is linked to any participant holding a share of the bill.
    pub async fn is_linked_user(
        pool: &PgPool,
        bill_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM bill_participants bp
                JOIN participants p ON p.id = bp.participant_id
                WHERE bp.bill_id = $1 AND p.user_id = $2
             )",
        )
        .bind(bill_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Set or clear the confirmation flag, stamping `confirmed_at`.
    ///
    /// `None` when the share is missing or the bill has been completed.
    pub async fn set_confirmed(
        pool: &PgPool,
        bill_id: DbId,
        participant_id: DbId,
        confirmed: bool,
    ) -> Result<Option<BillParticipant>, sqlx::Error> {
        let query = format!(
            "UPDATE bill_participants SET
                is_confirmed = $3,
                confirmed_at = CASE WHEN $3 THEN NOW() ELSE NULL END
             WHERE bill_id = $1 AND participant_id = $2
               AND EXISTS (SELECT 1 FROM bills WHERE id = $1 AND NOT is_completed)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BillParticipant>(&query)
            .bind(bill_id)
            .bind(participant_id)
            .bind(confirmed)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the paid flag, stamping `paid_at`. Same `None` cases as
    /// [`Self::set_confirmed`].
    pub async fn set_paid(
        pool: &PgPool,
        bill_id: DbId,
        participant_id: DbId,
        paid: bool,
    ) -> Result<Option<BillParticipant>, sqlx::Error> {
        let query = format!(
            "UPDATE bill_participants SET
                is_paid = $3,
                paid_at = CASE WHEN $3 THEN NOW() ELSE NULL END
             WHERE bill_id = $1 AND participant_id = $2
               AND EXISTS (SELECT 1 FROM bills WHERE id = $1 AND NOT is_completed)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BillParticipant>(&query)
            .bind(bill_id)
            .bind(participant_id)
            .bind(paid)
            .fetch_optional(pool)
            .await
    }
}
