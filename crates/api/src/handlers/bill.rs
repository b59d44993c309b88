//! Handlers for the `/bills` resource.
//!
//! Visibility: a bill is visible to its creator and to users linked to one
//! of its participants. Everyone else gets 404. Linked users may confirm and
//! pay their own share; everything else is creator-only (403).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sv_core::bill::{validate_category, validate_description, validate_title, DEFAULT_CATEGORY};
use sv_core::error::{CoreError, Entity};
use sv_core::money::normalize_currency;
use sv_core::settlement::{ensure_open, summarize, BillSummary};
use sv_core::split::{compute_split, Share, ShareInput, SplitType};
use sv_core::types::{DbId, Money};
use sv_db::models::bill::{Bill, BillParticipant, BillShareDetail, CreateBill, UpdateBill};
use sv_db::models::user::User;
use sv_db::repositories::{
    BillParticipantRepo, BillRepo, CompleteOutcome, ParticipantRepo, UserRepo,
};
use sv_mail::templates::{self, ShareNotice};
use sv_mail::EmailMessage;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::notifications;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    pub title: String,
    pub description: Option<String>,
    pub total_amount: Money,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub split_type: SplitType,
    pub participants: Vec<ShareInput>,
}

/// Body of `PUT /bills/{id}/split`. Omitting `total_amount` keeps the current total.
#[derive(Debug, Deserialize)]
pub struct SplitRequest {
    pub total_amount: Option<Money>,
    pub split_type: SplitType,
    pub participants: Vec<ShareInput>,
}

/// A bill with its shares and payment summary.
#[derive(Debug, Serialize)]
pub struct BillDetail {
    #[serde(flatten)]
    pub bill: Bill,
    pub participants: Vec<BillShareDetail>,
    pub summary: BillSummary,
}

#[derive(Debug, Serialize)]
pub struct RemindResponse {
    /// Unpaid shares that have an email address.
    pub eligible: usize,
    /// Reminders accepted by the mail transport.
    pub sent: usize,
}

// ---------------------------------------------------------------------------
// Access helpers
// ---------------------------------------------------------------------------

fn bill_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: Entity::Bill, id })
}

/// A conditional write found the bill completed after the handler's check.
fn bill_completed() -> AppError {
    AppError::Core(CoreError::Conflict("Bill was completed".into()))
}

/// Load a bill the user may see. Invisible bills look missing.
async fn load_visible(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Bill> {
    let bill = BillRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| bill_not_found(id))?;
    if bill.creator_id == user.user_id
        || BillParticipantRepo::is_linked_user(&state.pool, id, user.user_id).await?
    {
        Ok(bill)
    } else {
        Err(bill_not_found(id))
    }
}

/// Load a visible bill and require the caller to be its creator.
async fn load_owned(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Bill> {
    let bill = load_visible(state, id, user).await?;
    if bill.creator_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the bill's creator can do this".into(),
        )));
    }
    Ok(bill)
}

async fn load_share(state: &AppState, bill_id: DbId, participant_id: DbId) -> AppResult<BillShareDetail> {
    BillParticipantRepo::find_detail(&state.pool, bill_id, participant_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: Entity::BillShare,
                id: participant_id,
            })
        })
}

/// The creator may act on any share; a linked user only on their own.
fn ensure_share_actor(bill: &Bill, share: &BillShareDetail, user: &AuthUser) -> AppResult<()> {
    if bill.creator_id == user.user_id || share.user_id == Some(user.user_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You can only update your own share".into(),
        )))
    }
}

async fn detail(state: &AppState, bill: Bill) -> AppResult<BillDetail> {
    let participants = BillParticipantRepo::list_details(&state.pool, bill.id).await?;
    let states: Vec<_> = participants.iter().map(BillShareDetail::state).collect();
    Ok(BillDetail {
        bill,
        summary: summarize(&states),
        participants,
    })
}

/// Every share must reference one of the creator's own contacts.
async fn ensure_owned_participants(
    state: &AppState,
    owner_id: DbId,
    shares: &[Share],
) -> AppResult<()> {
    let ids: Vec<DbId> = shares.iter().map(|s| s.participant_id).collect();
    let owned = ParticipantRepo::count_owned(&state.pool, owner_id, &ids).await?;
    if owned != ids.len() as i64 {
        return Err(AppError::Core(CoreError::Validation(
            "Every participant must be one of your contacts".into(),
        )));
    }
    Ok(())
}

fn share_notice<'a>(
    bill: &'a Bill,
    share: &'a BillShareDetail,
    bill_url: &'a str,
) -> ShareNotice<'a> {
    ShareNotice {
        participant_name: &share.name,
        bill_title: &bill.title,
        amount: &share.amount_owed,
        currency: &bill.currency,
        bill_url,
    }
}

/// Name used in invitation mails. The bill is already stored when this runs,
/// so a failed lookup only costs the greeting.
fn inviter_name(bill_id: DbId, lookup: Result<Option<User>, sqlx::Error>) -> String {
    match lookup {
        Ok(user) => user.map(|u| u.display_name).unwrap_or_default(),
        Err(e) => {
            tracing::warn!(bill_id, error = %e, "Creator lookup for invitations failed");
            String::new()
        }
    }
}

/// Invitation emails for every share with an address, except the creator's own.
async fn send_invitations(state: &AppState, detail: &BillDetail) {
    let bill = &detail.bill;
    let creator_name = inviter_name(
        bill.id,
        UserRepo::find_by_id(&state.pool, bill.creator_id).await,
    );
    let url = state.config.bill_url(bill.id);

    let messages: Vec<EmailMessage> = detail
        .participants
        .iter()
        .filter(|s| s.user_id != Some(bill.creator_id))
        .filter_map(|s| {
            let to = s.email.as_deref()?;
            Some(templates::bill_invitation(
                to,
                &creator_name,
                &share_notice(bill, s, &url),
            ))
        })
        .collect();

    notifications::deliver(state, messages).await;
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/bills
///
/// Computes the split and stores the bill with all its shares in one
/// transaction, then emails the participants.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateBillRequest>,
) -> AppResult<(StatusCode, Json<BillDetail>)> {
    validate_title(&input.title)?;
    validate_description(input.description.as_deref())?;
    let category = input
        .category
        .as_deref()
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();
    validate_category(&category)?;
    let currency = normalize_currency(input.currency.as_deref())?;

    let shares = compute_split(input.total_amount, input.split_type, &input.participants)?;
    ensure_owned_participants(&state, user.user_id, &shares).await?;

    let (bill, _) = BillRepo::create_with_shares(
        &state.pool,
        &CreateBill {
            creator_id: user.user_id,
            title: input.title.trim().to_string(),
            description: input.description,
            total_amount: input.total_amount,
            currency,
            category,
            split_type: input.split_type.as_str().to_string(),
        },
        &shares,
    )
    .await?;
    tracing::info!(
        bill_id = bill.id,
        creator_id = user.user_id,
        shares = shares.len(),
        split_type = input.split_type.as_str(),
        "Bill created"
    );

    let detail = detail(&state, bill).await?;
    send_invitations(&state, &detail).await;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/bills
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Bill>>> {
    let bills = BillRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(bills))
}

/// GET /api/v1/bills/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<BillDetail>> {
    let bill = load_visible(&state, id, &user).await?;
    Ok(Json(detail(&state, bill).await?))
}

/// PUT /api/v1/bills/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateBill>,
) -> AppResult<Json<Bill>> {
    let bill = load_owned(&state, id, &user).await?;
    ensure_open(bill.is_completed)?;

    if let Some(title) = input.title.as_deref() {
        validate_title(title)?;
    }
    validate_description(input.description.as_deref())?;
    if let Some(category) = input.category.as_deref() {
        validate_category(category)?;
    }
    input.title = input.title.map(|t| t.trim().to_string());

    let bill = BillRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(bill_completed)?;
    Ok(Json(bill))
}

/// DELETE /api/v1/bills/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, id, &user).await?;
    if BillRepo::delete(&state.pool, id).await? {
        tracing::info!(bill_id = id, "Bill deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(bill_not_found(id))
    }
}

/// PUT /api/v1/bills/{id}/split
///
/// Replaces every share. Paid and confirmed flags start over.
pub async fn resplit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SplitRequest>,
) -> AppResult<Json<BillDetail>> {
    let bill = load_owned(&state, id, &user).await?;
    ensure_open(bill.is_completed)?;

    let total = input.total_amount.unwrap_or(bill.total_amount);
    let shares = compute_split(total, input.split_type, &input.participants)?;
    ensure_owned_participants(&state, user.user_id, &shares).await?;

    let (bill, _) = BillRepo::replace_shares(
        &state.pool,
        id,
        total,
        input.split_type.as_str(),
        &shares,
    )
    .await?
    .ok_or_else(bill_completed)?;
    tracing::info!(bill_id = id, shares = shares.len(), "Bill re-split");

    Ok(Json(detail(&state, bill).await?))
}

/// POST /api/v1/bills/{id}/participants/{participant_id}/confirm
pub async fn confirm_share(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, participant_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<BillParticipant>> {
    let bill = load_visible(&state, id, &user).await?;
    let share = load_share(&state, id, participant_id).await?;
    ensure_share_actor(&bill, &share, &user)?;
    ensure_open(bill.is_completed)?;

    let row = BillParticipantRepo::set_confirmed(&state.pool, id, participant_id, true)
        .await?
        .ok_or_else(bill_completed)?;
    Ok(Json(row))
}

/// POST /api/v1/bills/{id}/participants/{participant_id}/pay
pub async fn mark_paid(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, participant_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<BillParticipant>> {
    let bill = load_visible(&state, id, &user).await?;
    let share = load_share(&state, id, participant_id).await?;
    ensure_share_actor(&bill, &share, &user)?;
    ensure_open(bill.is_completed)?;

    let row = BillParticipantRepo::set_paid(&state.pool, id, participant_id, true)
        .await?
        .ok_or_else(bill_completed)?;
    Ok(Json(row))
}

/// DELETE /api/v1/bills/{id}/participants/{participant_id}/pay
pub async fn unmark_paid(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, participant_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<BillParticipant>> {
    let bill = load_owned(&state, id, &user).await?;
    load_share(&state, id, participant_id).await?;
    ensure_open(bill.is_completed)?;

    let row = BillParticipantRepo::set_paid(&state.pool, id, participant_id, false)
        .await?
        .ok_or_else(bill_completed)?;
    Ok(Json(row))
}

/// POST /api/v1/bills/{id}/complete
///
/// Allowed for the creator at any time, for anyone else who can see the bill
/// once every participant has confirmed.
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<BillDetail>> {
    load_visible(&state, id, &user).await?;
    let bill = match BillRepo::complete(&state.pool, id, user.user_id).await? {
        CompleteOutcome::Completed(bill) => bill,
        CompleteOutcome::Rejected(err) => return Err(err.into()),
    };
    tracing::info!(bill_id = id, completed_by = user.user_id, "Bill completed");

    let shares = BillParticipantRepo::list_details(&state.pool, id).await?;

    let url = state.config.bill_url(bill.id);
    let messages = shares
        .iter()
        .filter_map(|s| {
            let to = s.email.as_deref()?;
            Some(templates::bill_completed(to, &s.name, &bill.title, &url))
        })
        .collect();
    notifications::deliver(&state, messages).await;

    Ok(Json(detail(&state, bill).await?))
}

/// POST /api/v1/bills/{id}/remind
pub async fn remind(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<RemindResponse>> {
    let bill = load_owned(&state, id, &user).await?;
    ensure_open(bill.is_completed)?;

    let shares = BillParticipantRepo::list_details(&state.pool, id).await?;
    let url = state.config.bill_url(bill.id);
    let messages: Vec<EmailMessage> = shares
        .iter()
        .filter(|s| !s.is_paid)
        .filter_map(|s| {
            let to = s.email.as_deref()?;
            Some(templates::payment_reminder(to, &share_notice(&bill, s, &url)))
        })
        .collect();

    let eligible = messages.len();
    let sent = notifications::deliver(&state, messages).await;
    tracing::info!(bill_id = id, eligible, sent, "Payment reminders sent");
    Ok(Json(RemindResponse { eligible, sent }))
}

/// GET /api/v1/bills/{id}/summary
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<BillSummary>> {
    load_visible(&state, id, &user).await?;
    let shares = BillParticipantRepo::list_details(&state.pool, id).await?;
    let states: Vec<_> = shares.iter().map(BillShareDetail::state).collect();
    Ok(Json(summarize(&states)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inviter_name_falls_back_when_lookup_fails() {
        assert_eq!(inviter_name(1, Err(sqlx::Error::PoolTimedOut)), "");
        assert_eq!(inviter_name(1, Ok(None)), "");
    }
}
