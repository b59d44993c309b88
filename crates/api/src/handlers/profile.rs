//! Handlers for `/profile` and `/profiles/{id}`.

use axum::extract::{Path, State};
use axum::Json;
use sv_core::error::{CoreError, Entity};
use sv_core::types::DbId;
use sv_core::validation::{validate_name, validate_text};
use sv_db::models::user::{Profile, PublicProfile, UpdateProfile};
use sv_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const MAX_BIO_LEN: usize = 2000;
const MAX_AVATAR_URL_LEN: usize = 2048;

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: Entity::User, id })
}

/// GET /api/v1/profile
pub async fn get_own(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Profile>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| user_not_found(user.user_id))?;
    Ok(Json(row.into()))
}

/// PUT /api/v1/profile
pub async fn update_own(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<UpdateProfile>,
) -> AppResult<Json<Profile>> {
    if let Some(name) = input.display_name.as_deref() {
        validate_name("display_name", name)?;
    }
    if let Some(bio) = input.bio.as_deref() {
        validate_text("bio", bio, MAX_BIO_LEN)?;
    }
    if let Some(url) = input.avatar_url.as_deref() {
        validate_text("avatar_url", url, MAX_AVATAR_URL_LEN)?;
    }
    input.display_name = input.display_name.map(|n| n.trim().to_string());

    let row = UserRepo::update_profile(&state.pool, user.user_id, &input)
        .await?
        .ok_or_else(|| user_not_found(user.user_id))?;
    Ok(Json(row.into()))
}

/// GET /api/v1/profiles/{id}
pub async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PublicProfile>> {
    let row = UserRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(row.into()))
}
