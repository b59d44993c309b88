use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Profile routes, merged at the API root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::get_own).put(profile::update_own))
        .route("/profiles/{id}", get(profile::get_public))
}
