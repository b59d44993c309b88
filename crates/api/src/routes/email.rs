use axum::routing::post;
use axum::Router;

use crate::handlers::email;
use crate::state::AppState;

/// Routes mounted at `/email`.
pub fn router() -> Router<AppState> {
    Router::new().route("/test", post(email::send_test))
}
