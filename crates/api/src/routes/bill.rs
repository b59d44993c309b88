//! Route definitions for the `/bills` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::bill;
use crate::state::AppState;

/// Routes mounted at `/bills`.
///
/// ```text
/// GET    /                                    -> list
/// POST   /                                    -> create
/// GET    /{id}                                -> get_by_id
/// PUT    /{id}                                -> update
/// DELETE /{id}                                -> delete
/// PUT    /{id}/split                          -> resplit
/// POST   /{id}/complete                       -> complete
/// POST   /{id}/remind                         -> remind
/// GET    /{id}/summary                        -> summary
/// POST   /{id}/participants/{pid}/confirm     -> confirm_share
/// POST   /{id}/participants/{pid}/pay         -> mark_paid
/// DELETE /{id}/participants/{pid}/pay         -> unmark_paid
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bill::list).post(bill::create))
        .route(
            "/{id}",
            get(bill::get_by_id).put(bill::update).delete(bill::delete),
        )
        .route("/{id}/split", put(bill::resplit))
        .route("/{id}/complete", post(bill::complete))
        .route("/{id}/remind", post(bill::remind))
        .route("/{id}/summary", get(bill::summary))
        .route(
            "/{id}/participants/{participant_id}/confirm",
            post(bill::confirm_share),
        )
        .route(
            "/{id}/participants/{participant_id}/pay",
            post(bill::mark_paid).delete(bill::unmark_paid),
        )
}
