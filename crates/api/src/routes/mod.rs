pub mod auth;
pub mod bill;
pub mod email;
pub mod event;
pub mod health;
pub mod participant;
pub mod profile;
pub mod ticket;

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register | login | refresh | logout
/// /profile                                          own profile (get, update)
/// /profiles/{id}                                    public profile
///
/// /participants                                     list, create
/// /participants/{id}                                get, update, delete
///
/// /bills                                            list, create
/// /bills/{id}                                       get, update, delete
/// /bills/{id}/split                                 re-split (PUT)
/// /bills/{id}/complete                              complete (POST)
/// /bills/{id}/remind                                payment reminders (POST)
/// /bills/{id}/summary                               payment summary
/// /bills/{id}/participants/{pid}/confirm            confirm share (POST)
/// /bills/{id}/participants/{pid}/pay                mark (POST) / unmark (DELETE) paid
///
/// /events                                           list, create
/// /events/{id}                                      get, update, delete
/// /events/{id}/publish | unpublish | cancel         status transitions (POST)
/// /events/{id}/registrations                        list (organizer), register
/// /events/{id}/comments                             list, add
/// /registrations/{id}/confirm | cancel              (POST)
/// /tickets/{code}                                   lookup
/// /tickets/{code}/check-in                          (POST)
/// /comments/{id}                                    delete
///
/// /email/test                                       send a test email (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(profile::router())
        .nest("/participants", participant::router())
        .nest("/bills", bill::router())
        .nest("/events", event::router())
        .route(
            "/registrations/{id}/confirm",
            post(handlers::registration::confirm),
        )
        .route(
            "/registrations/{id}/cancel",
            post(handlers::registration::cancel),
        )
        .nest("/tickets", ticket::router())
        .route("/comments/{id}", delete(handlers::comment::delete))
        .nest("/email", email::router())
}
