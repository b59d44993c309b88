//! Handlers for the `/participants` resource: a user's own contact list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sv_core::error::{CoreError, Entity};
use sv_core::types::DbId;
use sv_core::validation::{normalize_email, validate_email, validate_name, validate_text};
use sv_db::models::participant::{CreateParticipant, Participant, UpdateParticipant};
use sv_db::repositories::{ParticipantRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const MAX_PHONE_LEN: usize = 32;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: Entity::Participant,
        id,
    })
}

/// Validate contact fields, normalize the email, and resolve the linked user.
///
/// An explicit `user_id` must exist. Without one, a contact whose email
/// matches a registered account is linked to it, so that user can see and
/// confirm their shares.
async fn prepare(
    state: &AppState,
    name: Option<&str>,
    email: &mut Option<String>,
    phone: Option<&str>,
    user_id: &mut Option<DbId>,
) -> AppResult<()> {
    if let Some(name) = name {
        validate_name("name", name)?;
    }
    if let Some(phone) = phone {
        validate_text("phone", phone, MAX_PHONE_LEN)?;
    }
    if let Some(raw) = email.as_deref() {
        let normalized = normalize_email(raw);
        validate_email(&normalized)?;
        *email = Some(normalized);
    }

    match *user_id {
        Some(id) => {
            if UserRepo::find_by_id(&state.pool, id).await?.is_none() {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "User {id} does not exist"
                ))));
            }
        }
        None => {
            if let Some(addr) = email.as_deref() {
                *user_id = UserRepo::find_by_email(&state.pool, addr)
                    .await?
                    .map(|u| u.id);
            }
        }
    }
    Ok(())
}

/// POST /api/v1/participants
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateParticipant>,
) -> AppResult<(StatusCode, Json<Participant>)> {
    prepare(
        &state,
        Some(&input.name),
        &mut input.email,
        input.phone.as_deref(),
        &mut input.user_id,
    )
    .await?;
    input.name = input.name.trim().to_string();

    let participant = ParticipantRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// GET /api/v1/participants
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Participant>>> {
    let participants = ParticipantRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(participants))
}

/// GET /api/v1/participants/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Participant>> {
    let participant = ParticipantRepo::find_owned(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(participant))
}

/// PUT /api/v1/participants/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateParticipant>,
) -> AppResult<Json<Participant>> {
    prepare(
        &state,
        input.name.as_deref(),
        &mut input.email,
        input.phone.as_deref(),
        &mut input.user_id,
    )
    .await?;
    input.name = input.name.map(|n| n.trim().to_string());

    let participant = ParticipantRepo::update(&state.pool, user.user_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(participant))
}

/// DELETE /api/v1/participants/{id}
///
/// A contact that still holds a share on some bill cannot be removed (409).
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ParticipantRepo::delete(&state.pool, user.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
