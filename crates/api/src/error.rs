use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sv_core::error::CoreError;
use sv_mail::MailError;

/// Everything a handler can fail with.
///
/// The JSON body is always `{ "error": message, "code": CODE }`; clients
/// branch on `code`, the message is for humans.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Only surfaced by endpoints whose whole purpose is delivery.
    #[error("Mail delivery failed: {0}")]
    Mail(#[from] MailError),

    /// A lookup by a non-numeric key (e.g. a ticket code) found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

type Rendered = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Core(core) => render_core(core),
            AppError::Database(err) => render_sqlx(&err),
            AppError::Mail(err) => {
                tracing::warn!(error = %err, "Mail delivery failed");
                (StatusCode::BAD_GATEWAY, "MAIL_DELIVERY_FAILED", err.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

fn render_core(err: CoreError) -> Rendered {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

fn internal() -> Rendered {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Human message for a known unique constraint.
fn duplicate_message(constraint: &str) -> String {
    match constraint {
        "uq_users_email" => "An account with this email already exists".to_string(),
        "uq_registrations_event_email" => {
            "This email is already registered for the event".to_string()
        }
        "uq_bill_participants_bill_participant" => {
            "A participant appears more than once in the split".to_string()
        }
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

/// Map sqlx failures onto the API's error codes.
///
/// Row-not-found is 404. Unique violations on `uq_*` constraints and
/// foreign-key violations are 409. CHECK violations on `ck_*` constraints
/// are 400, since they mean input slipped past validation. Anything else is
/// logged and hidden behind a 500.
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return internal();
        }
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => {
            (StatusCode::CONFLICT, "CONFLICT", duplicate_message(constraint))
        }
        Some("23503") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Operation violates reference constraint: {constraint}"),
        ),
        Some("23514") if constraint.starts_with("ck_") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value rejected by check constraint: {constraint}"),
        ),
        _ => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}
