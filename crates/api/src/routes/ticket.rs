use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ticket;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{code}", get(ticket::get_by_code))
        .route("/{code}/check-in", post(ticket::check_in))
}
