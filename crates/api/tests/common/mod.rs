#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use sv_api::auth::jwt::JwtConfig;
use sv_api::config::ServerConfig;
use sv_api::router::build_app_router;
use sv_api::state::AppState;
use sv_mail::{MailConfig, Mailer};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
///
/// Mail goes through the log-only transport and links point at the dev
/// front-end origin.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        database_max_connections: 5,
        app_base_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig::new("test-secret-for-integration-tests"),
        mail: MailConfig::default(),
    }
}

/// Build the full application router on `pool` with the simulated mailer.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_mailer(pool, Mailer::simulated())
}

/// Same as [`build_test_app`] but with a caller-supplied mailer.
pub fn build_test_app_with_mailer(pool: PgPool, mailer: Mailer) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is not valid JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request failed")
}

fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request("GET", uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("GET", uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request("POST", uri, &body, None)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request("POST", uri, &body, Some(token))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("POST", uri, Some(token))).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request("PUT", uri, &body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("DELETE", uri, Some(token))).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A registered account and its access token.
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

/// Register `email` through the API and return its id and access token.
pub async fn register_user(pool: &PgPool, email: &str, display_name: &str) -> TestUser {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": email,
            "password": TEST_PASSWORD,
            "display_name": display_name,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "registering {email} failed");

    let json = body_json(response).await;
    TestUser {
        id: json["user"]["id"].as_i64().unwrap(),
        token: json["access_token"].as_str().unwrap().to_string(),
    }
}

/// Create a participant owned by `owner` and return its id.
pub async fn create_participant(pool: &PgPool, owner: &TestUser, name: &str, email: Option<&str>) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/participants",
        serde_json::json!({ "name": name, "email": email }),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), 201, "creating participant {name} failed");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create an event as `organizer` starting a week from now; returns its id.
pub async fn create_event(pool: &PgPool, organizer: &TestUser, capacity: Option<i32>) -> i64 {
    let starts_at = chrono::Utc::now() + chrono::Duration::days(7);
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/events",
        serde_json::json!({
            "title": "Rooftop Meetup",
            "location": "Pier 7",
            "starts_at": starts_at,
            "capacity": capacity,
        }),
        &organizer.token,
    )
    .await;
    assert_eq!(response.status(), 201, "creating event failed");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create and publish an event; returns its id.
pub async fn create_published_event(pool: &PgPool, organizer: &TestUser, capacity: Option<i32>) -> i64 {
    let id = create_event(pool, organizer, capacity).await;
    let app = build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/events/{id}/publish"), &organizer.token).await;
    assert_eq!(response.status(), 200, "publishing event {id} failed");
    id
}
