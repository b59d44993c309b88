//! HTTP-level integration tests for Ventopia: events, registrations,
//! tickets and comments.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_event, create_published_event, delete_auth, get, get_auth, post_auth,
    post_json, post_json_auth, put_json_auth, TestUser,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn register_attendee(pool: &PgPool, event_id: i64, name: &str, email: &str) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/events/{event_id}/registrations"),
        json!({ "attendee_name": name, "attendee_email": email }),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn confirm(pool: &PgPool, registration_id: i64, user: &TestUser) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_auth(
        app,
        &format!("/api/v1/registrations/{registration_id}/confirm"),
        &user.token,
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_events_are_drafts_hidden_from_the_public(pool: PgPool) {
    let organizer = common::register_user(&pool, "org@example.com", "Org").await;
    let id = create_event(&pool, &organizer, None).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/events/{id}"), &organizer.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "draft");
    assert_eq!(json["ticket_price"], "0.00");
    assert_eq!(json["currency"], "USD");

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/events/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/events").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_and_list(pool: PgPool) {
    let organizer = common::register_user(&pool, "pub@example.com", "Pub").await;
    create_event(&pool, &organizer, None).await;
    let published = create_published_event(&pool, &organizer, None).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/events").await;
    assert_eq!(response.status(), StatusCode::OK);
    let events = body_json(response).await;
    let ids: Vec<i64> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![published]);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/events?mine=true", &organizer.token).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/events?mine=true").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Publishing twice is not a valid transition.
    let app = common::build_test_app(pool);
    let response = post_auth(
        app,
        &format!("/api/v1/events/{published}/publish"),
        &organizer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_schedule_is_validated(pool: PgPool) {
    let organizer = common::register_user(&pool, "sched@example.com", "Sched").await;
    let id = create_event(&pool, &organizer, None).await;

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/events/{id}"),
        json!({ "ends_at": "2000-01-01T00:00:00Z" }),
        &organizer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_the_organizer_manages_an_event(pool: PgPool) {
    let organizer = common::register_user(&pool, "boss@example.com", "Boss").await;
    let other = common::register_user(&pool, "guest@example.com", "Guest").await;
    let id = create_published_event(&pool, &organizer, None).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/events/{id}"),
        json!({ "title": "Hijacked" }),
        &other.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/events/{id}/registrations"),
        &other.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Registrations and tickets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_registration_lifecycle_with_ticket_check_in(pool: PgPool) {
    let organizer = common::register_user(&pool, "host@example.com", "Host").await;
    let event_id = create_published_event(&pool, &organizer, Some(10)).await;

    let (status, registration) =
        register_attendee(&pool, event_id, "Mia", "Mia@Example.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registration["status"], "pending");
    assert_eq!(registration["attendee_email"], "mia@example.com");
    let registration_id = registration["id"].as_i64().unwrap();

    let (status, confirmed) = confirm(&pool, registration_id, &organizer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["registration"]["status"], "confirmed");
    let code = confirmed["ticket"]["code"].as_str().unwrap().to_string();
    assert!(code.starts_with("VT-"));

    // Confirming again is a conflict.
    let (status, _) = confirm(&pool, registration_id, &organizer).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Ticket lookup is public.
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/tickets/{code}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let ticket = body_json(response).await;
    assert_eq!(ticket["attendee_name"], "Mia");
    assert_eq!(ticket["event_id"], event_id);
    assert!(ticket["checked_in_at"].is_null());

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/tickets/{code}/check-in");
    let response = post_auth(app, &uri, &organizer.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["checked_in_at"].is_string());

    let app = common::build_test_app(pool);
    let response = post_auth(app, &uri, &organizer.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_registration_returns_409(pool: PgPool) {
    let organizer = common::register_user(&pool, "dupes@example.com", "Dupes").await;
    let event_id = create_published_event(&pool, &organizer, None).await;

    let (status, _) = register_attendee(&pool, event_id, "Leo", "leo@example.com").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = register_attendee(&pool, event_id, "Leo again", "LEO@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirmation_respects_capacity(pool: PgPool) {
    let organizer = common::register_user(&pool, "cap@example.com", "Cap").await;
    let event_id = create_published_event(&pool, &organizer, Some(1)).await;

    let (_, first) = register_attendee(&pool, event_id, "First", "first@example.com").await;
    let (_, second) = register_attendee(&pool, event_id, "Second", "second@example.com").await;

    let (status, _) = confirm(&pool, first["id"].as_i64().unwrap(), &organizer).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = confirm(&pool, second["id"].as_i64().unwrap(), &organizer).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_organizer_confirms(pool: PgPool) {
    let organizer = common::register_user(&pool, "real@example.com", "Real").await;
    let impostor = common::register_user(&pool, "fake@example.com", "Fake").await;
    let event_id = create_published_event(&pool, &organizer, None).await;
    let (_, registration) = register_attendee(&pool, event_id, "Ivy", "ivy@example.com").await;

    let (status, _) = confirm(&pool, registration["id"].as_i64().unwrap(), &impostor).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_draft_events_do_not_accept_registrations(pool: PgPool) {
    let organizer = common::register_user(&pool, "drafty@example.com", "Drafty").await;
    let event_id = create_event(&pool, &organizer, None).await;

    let (status, _) = register_attendee(&pool, event_id, "Nope", "nope@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The organizer can see the draft, so the refusal is a state conflict.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/events/{event_id}/registrations"),
        json!({ "attendee_name": "Drafty", "attendee_email": "drafty@example.com" }),
        &organizer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
        .bind(event_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_registrant_can_cancel_own_registration(pool: PgPool) {
    let organizer = common::register_user(&pool, "o@example.com", "O").await;
    let attendee = common::register_user(&pool, "att@example.com", "Att").await;
    let stranger = common::register_user(&pool, "x@example.com", "X").await;
    let event_id = create_published_event(&pool, &organizer, None).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/events/{event_id}/registrations"),
        json!({ "attendee_name": "Att", "attendee_email": "att@example.com" }),
        &attendee.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let registration = body_json(response).await;
    assert_eq!(registration["user_id"], attendee.id);
    let cancel_uri = format!("/api/v1/registrations/{}/cancel", registration["id"]);

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &cancel_uri, &stranger.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &cancel_uri, &attendee.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "cancelled");

    let app = common::build_test_app(pool);
    let response = post_auth(app, &cancel_uri, &attendee.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancelling_an_event_notifies_registrants(pool: PgPool) {
    let organizer = common::register_user(&pool, "gone@example.com", "Gone").await;
    let event_id = create_published_event(&pool, &organizer, None).await;
    register_attendee(&pool, event_id, "Ana", "ana@example.com").await;
    register_attendee(&pool, event_id, "Ben", "ben@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = post_auth(
        app,
        &format!("/api/v1/events/{event_id}/cancel"),
        &organizer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "cancelled");

    let notified: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM email_log WHERE subject ILIKE '[Ventopia] Cancelled:%'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(notified, 2);

    // Cancelled events are frozen.
    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/events/{event_id}"),
        json!({ "title": "Back on" }),
        &organizer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ticket_lookup_errors(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/tickets/not-a-code").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/tickets/VT-000000000000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comments(pool: PgPool) {
    let organizer = common::register_user(&pool, "talk@example.com", "Talk").await;
    let author = common::register_user(&pool, "author@example.com", "Author").await;
    let event_id = create_published_event(&pool, &organizer, None).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/events/{event_id}/comments"),
        json!({ "body": "  Can I bring a friend?  " }),
        &author.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = body_json(response).await;
    assert_eq!(comment["body"], "Can I bring a friend?");
    let comment_id = comment["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/events/{event_id}/comments")).await;
    let comments = body_json(response).await;
    assert_eq!(comments[0]["author_name"], "Author");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/comments/{comment_id}"), &organizer.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/comments/{comment_id}"), &author.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
