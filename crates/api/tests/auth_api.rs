//! HTTP-level integration tests for registration, login, token refresh and
//! profiles.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, put_json_auth, TEST_PASSWORD};
use sqlx::PgPool;

async fn login(pool: &PgPool, email: &str, password: &str) -> axum::http::Response<axum::body::Body> {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_returns_tokens_and_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": "  Ana@Example.com ",
            "password": TEST_PASSWORD,
            "display_name": "Ana",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 900);
    assert_eq!(json["user"]["email"], "ana@example.com");
    assert_eq!(json["user"]["role"], "user");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_email_returns_409(pool: PgPool) {
    common::register_user(&pool, "dup@example.com", "First").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": "DUP@example.com",
            "password": TEST_PASSWORD,
            "display_name": "Second",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": "short@example.com",
            "password": "abc",
            "display_name": "Shorty",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    common::register_user(&pool, "login@example.com", "Login").await;

    let response = login(&pool, "login@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["user"]["display_name"], "Login");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password_and_unknown_email_look_the_same(pool: PgPool) {
    common::register_user(&pool, "known@example.com", "Known").await;

    let wrong_password = login(&pool, "known@example.com", "not-the-password").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(wrong_password).await;

    let unknown = login(&pool, "nobody@example.com", TEST_PASSWORD).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown = body_json(unknown).await;

    assert_eq!(wrong_password["error"], unknown["error"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_the_session(pool: PgPool) {
    let response = {
        common::register_user(&pool, "rotate@example.com", "Rotate").await;
        login(&pool, "rotate@example.com", TEST_PASSWORD).await
    };
    let json = body_json(response).await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], refresh_token);

    // The old token was revoked by the rotation.
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    let user = common::register_user(&pool, "bye@example.com", "Bye").await;
    let json = body_json(login(&pool, "bye@example.com", TEST_PASSWORD).await).await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/auth/logout", serde_json::json!({}), &user.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/profile").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/profile", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_read_profile(pool: PgPool) {
    let user = common::register_user(&pool, "prof@example.com", "Prof").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/profile",
        serde_json::json!({ "display_name": "Professor", "bio": "Splits bills for a living" }),
        &user.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["display_name"], "Professor");

    // The public view omits the email address.
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/profiles/{}", user.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["display_name"], "Professor");
    assert_eq!(json["bio"], "Splits bills for a living");
    assert!(json.get("email").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_profile_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/profiles/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
