//! Handlers for the `/events` resource and its status transitions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use sv_core::bill::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use sv_core::error::{CoreError, Entity};
use sv_core::event_status::{validate_capacity, validate_schedule, EventAction, EventStatus};
use sv_core::money::{normalize_currency, validate_non_negative_amount};
use sv_core::types::DbId;
use sv_core::validation::validate_text;
use sv_db::models::event::{CreateEvent, Event, UpdateEvent};
use sv_db::repositories::{EventRepo, RegistrationRepo};
use sv_mail::templates;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::notifications;
use crate::query::EventListParams;
use crate::state::AppState;

const MAX_LOCATION_LEN: usize = 300;

pub(crate) fn event_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: Entity::Event, id })
}

/// Load an event the caller may see: published events are public, drafts and
/// cancelled events only to their organizer.
pub(crate) async fn load_visible(
    state: &AppState,
    id: DbId,
    viewer: Option<DbId>,
) -> AppResult<Event> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| event_not_found(id))?;
    if event.status()? == EventStatus::Published || viewer == Some(event.organizer_id) {
        Ok(event)
    } else {
        Err(event_not_found(id))
    }
}

/// Load an event the caller organizes. Visible events owned by someone else
/// yield 403.
pub(crate) async fn load_organized(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Event> {
    let event = load_visible(state, id, Some(user.user_id)).await?;
    if event.organizer_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event's organizer can do this".into(),
        )));
    }
    Ok(event)
}

fn validate_details(
    title: Option<&str>,
    description: Option<&str>,
    location: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(title) = title {
        validate_text("title", title, MAX_TITLE_LEN)?;
    }
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(CoreError::Validation(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
    }
    if let Some(location) = location {
        validate_text("location", location, MAX_LOCATION_LEN)?;
    }
    Ok(())
}

/// GET /api/v1/events
///
/// Published events by default; `?mine=true` lists the caller's own events
/// in every status.
pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(params): Query<EventListParams>,
) -> AppResult<Json<Vec<Event>>> {
    if params.mine {
        let user = viewer.0.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Sign in to list your own events".into(),
            ))
        })?;
        let events = EventRepo::list_by_organizer(&state.pool, user.user_id).await?;
        return Ok(Json(events));
    }

    let page = params.page();
    let events = EventRepo::list_published(&state.pool, page.limit(), page.offset()).await?;
    Ok(Json(events))
}

/// POST /api/v1/events
///
/// New events start as drafts.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    validate_details(
        Some(&input.title),
        input.description.as_deref(),
        input.location.as_deref(),
    )?;
    validate_schedule(input.starts_at, input.ends_at)?;
    validate_capacity(input.capacity)?;
    let ticket_price = input.ticket_price.unwrap_or(Decimal::ZERO);
    validate_non_negative_amount(ticket_price)?;
    let currency = normalize_currency(input.currency.as_deref())?;
    input.title = input.title.trim().to_string();

    let event = EventRepo::create(&state.pool, user.user_id, &input, ticket_price, &currency).await?;
    tracing::info!(event_id = event.id, organizer_id = user.user_id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Event>> {
    Ok(Json(load_visible(&state, id, viewer.user_id()).await?))
}

/// PUT /api/v1/events/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateEvent>,
) -> AppResult<Json<Event>> {
    let event = load_organized(&state, id, &user).await?;
    event.status()?.ensure_editable()?;

    validate_details(
        input.title.as_deref(),
        input.description.as_deref(),
        input.location.as_deref(),
    )?;
    validate_schedule(
        input.starts_at.unwrap_or(event.starts_at),
        input.ends_at.or(event.ends_at),
    )?;
    validate_capacity(input.capacity)?;
    if let Some(price) = input.ticket_price {
        validate_non_negative_amount(price)?;
    }
    if input.currency.is_some() {
        input.currency = Some(normalize_currency(input.currency.as_deref())?);
    }
    input.title = input.title.map(|t| t.trim().to_string());

    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Event was cancelled".into())))?;
    Ok(Json(event))
}

/// DELETE /api/v1/events/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_organized(&state, id, &user).await?;
    if EventRepo::delete(&state.pool, id).await? {
        tracing::info!(event_id = id, "Event deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(event_not_found(id))
    }
}

async fn transition(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    action: EventAction,
) -> AppResult<Event> {
    let event = load_organized(state, id, user).await?;
    let from = event.status()?;
    let to = from.apply(action)?;

    let event = EventRepo::transition(&state.pool, id, from, to)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Event status changed concurrently; reload and retry".into(),
            ))
        })?;
    tracing::info!(event_id = id, from = from.as_str(), to = to.as_str(), "Event status changed");
    Ok(event)
}

/// POST /api/v1/events/{id}/publish
pub async fn publish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Event>> {
    Ok(Json(transition(&state, &user, id, EventAction::Publish).await?))
}

/// POST /api/v1/events/{id}/unpublish
pub async fn unpublish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Event>> {
    Ok(Json(transition(&state, &user, id, EventAction::Unpublish).await?))
}

/// POST /api/v1/events/{id}/cancel
///
/// Registrants that still planned to attend are told by email.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Event>> {
    let event = transition(&state, &user, id, EventAction::Cancel).await?;

    let registrations = RegistrationRepo::list_active_by_event(&state.pool, id).await?;
    let messages = registrations
        .iter()
        .map(|r| templates::event_cancelled(&r.attendee_email, &r.attendee_name, &event.title))
        .collect();
    notifications::deliver(&state, messages).await;

    Ok(Json(event))
}
