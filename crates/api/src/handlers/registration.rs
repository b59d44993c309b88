//! Handlers for event registrations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sv_core::error::{CoreError, Entity};
use sv_core::ticket::generate_ticket_code;
use sv_core::types::DbId;
use sv_core::validation::{normalize_email, validate_email, validate_name};
use sv_db::models::event::Event;
use sv_db::models::registration::{CreateRegistration, Registration};
use sv_db::models::ticket::Ticket;
use sv_db::repositories::{ConfirmOutcome, EventRepo, RegistrationRepo};
use sv_mail::templates;

use super::event::{event_not_found, load_organized, load_visible};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::notifications;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConfirmedRegistration {
    pub registration: Registration,
    pub ticket: Ticket,
}

fn registration_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: Entity::Registration,
        id,
    })
}

async fn load_with_event(state: &AppState, id: DbId) -> AppResult<(Registration, Event)> {
    let registration = RegistrationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| registration_not_found(id))?;
    let event = EventRepo::find_by_id(&state.pool, registration.event_id)
        .await?
        .ok_or_else(|| event_not_found(registration.event_id))?;
    Ok((registration, event))
}

/// GET /api/v1/events/{id}/registrations
pub async fn list_by_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<Vec<Registration>>> {
    load_organized(&state, event_id, &user).await?;
    let registrations = RegistrationRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(registrations))
}

/// POST /api/v1/events/{id}/registrations
///
/// Open to anonymous visitors. Signed-in users have the registration linked
/// to their account so they can cancel it later.
pub async fn create(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateRegistration>,
) -> AppResult<(StatusCode, Json<Registration>)> {
    let event = load_visible(&state, event_id, viewer.user_id()).await?;
    event.status()?.ensure_accepting_registrations()?;

    validate_name("attendee_name", &input.attendee_name)?;
    let email = normalize_email(&input.attendee_email);
    validate_email(&email)?;

    let registration = RegistrationRepo::create(
        &state.pool,
        event_id,
        viewer.user_id(),
        input.attendee_name.trim(),
        &email,
    )
    .await?;
    tracing::info!(
        registration_id = registration.id,
        event_id,
        "Registration received"
    );

    let message = templates::registration_received(
        &registration.attendee_email,
        &registration.attendee_name,
        &event.title,
        &event.starts_at,
    );
    notifications::deliver(&state, vec![message]).await;

    Ok((StatusCode::CREATED, Json(registration)))
}

/// POST /api/v1/registrations/{id}/confirm
///
/// Organizer only. Confirms the seat and issues the ticket atomically.
pub async fn confirm(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ConfirmedRegistration>> {
    let (registration, event) = load_with_event(&state, id).await?;
    if event.organizer_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event's organizer can confirm registrations".into(),
        )));
    }
    event.status()?.ensure_accepting_registrations()?;
    registration.status()?.confirm()?;

    let code = generate_ticket_code();
    let (registration, ticket) =
        match RegistrationRepo::confirm_with_ticket(&state.pool, id, event.id, &code).await? {
            ConfirmOutcome::Confirmed {
                registration,
                ticket,
            } => (registration, ticket),
            ConfirmOutcome::Rejected(err) => return Err(err.into()),
        };
    tracing::info!(registration_id = id, event_id = event.id, "Registration confirmed");

    let message = templates::registration_confirmed(
        &registration.attendee_email,
        &registration.attendee_name,
        &event.title,
        &event.starts_at,
        event.location.as_deref(),
        &ticket.code,
    );
    notifications::deliver(&state, vec![message]).await;

    Ok(Json(ConfirmedRegistration {
        registration,
        ticket,
    }))
}

/// POST /api/v1/registrations/{id}/cancel
///
/// The organizer or the registered user.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Registration>> {
    let (registration, event) = load_with_event(&state, id).await?;
    let is_organizer = event.organizer_id == user.user_id;
    let is_registrant = registration.user_id == Some(user.user_id);
    if !is_organizer && !is_registrant {
        return Err(registration_not_found(id));
    }

    let from = registration.status()?;
    let to = from.cancel()?;

    let registration = RegistrationRepo::transition(&state.pool, id, from, to)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Registration status changed concurrently; reload and retry".into(),
            ))
        })?;
    tracing::info!(registration_id = id, by_organizer = is_organizer, "Registration cancelled");
    Ok(Json(registration))
}
