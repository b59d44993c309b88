//! Repository for the `bills` table.
//!
//! Bills and their shares are always written together: creation and
//! re-splitting run in a single transaction so a bill never exists with a
//! partial set of shares.

use sqlx::{PgPool, Postgres, Transaction};
use sv_core::error::{CoreError, Entity};
use sv_core::settlement::check_completion;
use sv_core::split::Share;
use sv_core::types::{DbId, Money};

use crate::models::bill::{Bill, BillParticipant, CreateBill, UpdateBill};
use crate::repositories::bill_participant_repo::COLUMNS as SHARE_COLUMNS;

const COLUMNS: &str = "id, creator_id, title, description, total_amount, currency, category, \
                       split_type, is_completed, completed_at, created_at, updated_at";

/// Result of [`BillRepo::complete`].
#[derive(Debug)]
pub enum CompleteOutcome {
    Completed(Bill),
    /// Nothing was written; the error says why.
    Rejected(CoreError),
}

pub struct BillRepo;

impl BillRepo {
    /// Insert a bill and one `bill_participants` row per computed share.
    pub async fn create_with_shares(
        pool: &PgPool,
        input: &CreateBill,
        shares: &[Share],
    ) -> Result<(Bill, Vec<BillParticipant>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO bills (creator_id, title, description, total_amount, currency, category, split_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let bill = sqlx::query_as::<_, Bill>(&query)
            .bind(input.creator_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.total_amount)
            .bind(&input.currency)
            .bind(&input.category)
            .bind(&input.split_type)
            .fetch_one(&mut *tx)
            .await?;

        let rows = Self::insert_shares(&mut tx, bill.id, shares).await?;

        tx.commit().await?;
        Ok((bill, rows))
    }

    /// Replace every share of a bill with a freshly computed split.
    ///
    /// Paid and confirmed flags start over because the amounts changed.
    /// Returns `None` if the bill does not exist or is already completed.
    pub async fn replace_shares(
        pool: &PgPool,
        bill_id: DbId,
        total_amount: Money,
        split_type: &str,
        shares: &[Share],
    ) -> Result<Option<(Bill, Vec<BillParticipant>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE bills SET total_amount = $2, split_type = $3
             WHERE id = $1 AND is_completed = false
             RETURNING {COLUMNS}"
        );
        let Some(bill) = sqlx::query_as::<_, Bill>(&query)
            .bind(bill_id)
            .bind(total_amount)
            .bind(split_type)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM bill_participants WHERE bill_id = $1")
            .bind(bill_id)
            .execute(&mut *tx)
            .await?;

        let rows = Self::insert_shares(&mut tx, bill_id, shares).await?;

        tx.commit().await?;
        Ok(Some((bill, rows)))
    }

    async fn insert_shares(
        tx: &mut Transaction<'_, Postgres>,
        bill_id: DbId,
        shares: &[Share],
    ) -> Result<Vec<BillParticipant>, sqlx::Error> {
        let query = format!(
            "INSERT INTO bill_participants (bill_id, participant_id, amount_owed, percentage)
             VALUES ($1, $2, $3, $4)
             RETURNING {SHARE_COLUMNS}"
        );
        let mut rows = Vec::with_capacity(shares.len());
        for share in shares {
            let row = sqlx::query_as::<_, BillParticipant>(&query)
                .bind(bill_id)
                .bind(share.participant_id)
                .bind(share.amount_owed)
                .bind(share.percentage)
                .fetch_one(&mut **tx)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Bill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bills WHERE id = $1");
        sqlx::query_as::<_, Bill>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Bills the user created or holds a share in (through a linked participant),
    /// newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Bill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bills b
             WHERE b.creator_id = $1
                OR EXISTS (
                    SELECT 1 FROM bill_participants bp
                    JOIN participants p ON p.id = bp.participant_id
                    WHERE bp.bill_id = b.id AND p.user_id = $1
                )
             ORDER BY b.created_at DESC, b.id DESC"
        );
        sqlx::query_as::<_, Bill>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Edit metadata of an open bill. Returns `None` if missing or completed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBill,
    ) -> Result<Option<Bill>, sqlx::Error> {
        let query = format!(
            "UPDATE bills SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category)
             WHERE id = $1 AND is_completed = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bill>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .fetch_optional(pool)
            .await
    }

    /// Gate and record completion in one transaction.
    ///
    /// The bill row is locked before the shares are read, so a concurrent
    /// re-split (which updates the same row first) either finishes before the
    /// confirmations are checked or waits until completion has committed.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        requester: DbId,
    ) -> Result<CompleteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId, bool)> =
            sqlx::query_as("SELECT creator_id, is_completed FROM bills WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((creator_id, is_completed)) = locked else {
            return Ok(CompleteOutcome::Rejected(CoreError::NotFound {
                entity: Entity::Bill,
                id,
            }));
        };

        let query = format!("SELECT {SHARE_COLUMNS} FROM bill_participants WHERE bill_id = $1");
        let shares = sqlx::query_as::<_, BillParticipant>(&query)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
        let states: Vec<_> = shares.iter().map(BillParticipant::state).collect();
        if let Err(err) = check_completion(requester, creator_id, is_completed, &states) {
            return Ok(CompleteOutcome::Rejected(err));
        }

        let query = format!(
            "UPDATE bills SET is_completed = true, completed_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let bill = sqlx::query_as::<_, Bill>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CompleteOutcome::Completed(bill))
    }

    /// Delete a bill and (by cascade) its shares.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bills WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
