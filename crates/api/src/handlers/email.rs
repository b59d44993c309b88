//! Handler for `POST /email/test`.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use sv_core::validation::{normalize_email, validate_email};
use sv_mail::{templates, DeliveryReceipt};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::notifications::send_and_record;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TestEmailRequest {
    pub to: String,
}

/// POST /api/v1/email/test
///
/// Sends a test message through the configured transport. Unlike the
/// notification paths, a delivery failure is returned to the caller (502).
pub async fn send_test(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<TestEmailRequest>,
) -> AppResult<Json<DeliveryReceipt>> {
    let to = normalize_email(&input.to);
    validate_email(&to)?;

    let message = templates::test_email(&to, state.mailer.transport_kind().as_str());
    let receipt = send_and_record(&state, &message).await?;
    tracing::info!(
        requested_by = user.user_id,
        transport = receipt.transport,
        "Test email sent"
    );
    Ok(Json(receipt))
}
