//! Handlers for event comments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sv_core::error::{CoreError, Entity};
use sv_core::types::DbId;
use sv_core::validation::validate_comment_body;
use sv_db::models::comment::{Comment, CommentWithAuthor, CreateComment};
use sv_db::repositories::CommentRepo;

use super::event::load_visible;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// GET /api/v1/events/{id}/comments
pub async fn list_by_event(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<Vec<CommentWithAuthor>>> {
    load_visible(&state, event_id, viewer.user_id()).await?;
    let comments = CommentRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(comments))
}

/// POST /api/v1/events/{id}/comments
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    load_visible(&state, event_id, Some(user.user_id)).await?;
    validate_comment_body(&input.body)?;

    let comment = CommentRepo::create(&state.pool, event_id, user.user_id, input.body.trim()).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/v1/comments/{id}
///
/// Authors delete their own comments; admins delete any.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let not_found = || AppError::Core(CoreError::NotFound { entity: Entity::Comment, id });

    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    if comment.author_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only delete your own comments".into(),
        )));
    }

    if CommentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
