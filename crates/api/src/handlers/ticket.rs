//! Handlers for `/tickets/{code}`.

use axum::extract::{Path, State};
use axum::Json;
use sv_core::error::CoreError;
use sv_core::event_status::RegistrationStatus;
use sv_core::ticket::validate_ticket_code;
use sv_db::models::ticket::{Ticket, TicketDetail};
use sv_db::repositories::TicketRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

async fn load(state: &AppState, code: &str) -> AppResult<TicketDetail> {
    validate_ticket_code(code)?;
    TicketRepo::find_detail_by_code(&state.pool, code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ticket {code} not found")))
}

/// GET /api/v1/tickets/{code}
///
/// The code itself is the credential, so no sign-in is required.
pub async fn get_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<TicketDetail>> {
    Ok(Json(load(&state, &code).await?))
}

/// POST /api/v1/tickets/{code}/check-in
pub async fn check_in(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<Ticket>> {
    let detail = load(&state, &code).await?;
    if detail.organizer_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event's organizer can check in tickets".into(),
        )));
    }
    if RegistrationStatus::parse(&detail.registration_status)? != RegistrationStatus::Confirmed {
        return Err(AppError::Core(CoreError::Conflict(
            "Ticket belongs to a cancelled registration".into(),
        )));
    }

    let ticket = TicketRepo::check_in(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Ticket already checked in".into())))?;
    tracing::info!(ticket_id = ticket.id, event_id = detail.event_id, "Ticket checked in");
    Ok(Json(ticket))
}
