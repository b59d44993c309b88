//! Route definitions for the `/events` resource.
//!
//! Also nests registrations and comments under `/events/{id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{comment, event, registration};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// POST   /{id}/publish          -> publish
/// POST   /{id}/unpublish        -> unpublish
/// POST   /{id}/cancel           -> cancel
/// GET    /{id}/registrations    -> registration::list_by_event
/// POST   /{id}/registrations    -> registration::create
/// GET    /{id}/comments         -> comment::list_by_event
/// POST   /{id}/comments         -> comment::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(event::list).post(event::create))
        .route(
            "/{id}",
            get(event::get_by_id)
                .put(event::update)
                .delete(event::delete),
        )
        .route("/{id}/publish", post(event::publish))
        .route("/{id}/unpublish", post(event::unpublish))
        .route("/{id}/cancel", post(event::cancel))
        .route(
            "/{id}/registrations",
            get(registration::list_by_event).post(registration::create),
        )
        .route(
            "/{id}/comments",
            get(comment::list_by_event).post(comment::create),
        )
}
