//! Outbound email audit rows.

use serde::Serialize;
use sqlx::FromRow;
use sv_core::types::{DbId, Timestamp};

pub const EMAIL_STATUS_SENT: &str = "sent";
pub const EMAIL_STATUS_FAILED: &str = "failed";

/// A row from the `email_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmailLogEntry {
    pub id: DbId,
    pub recipient: String,
    pub subject: String,
    pub transport: String,
    pub status: String,
    pub error: Option<String>,
    pub created_at: Timestamp,
}

pub struct CreateEmailLog<'a> {
    pub recipient: &'a str,
    pub subject: &'a str,
    pub transport: &'a str,
    pub status: &'a str,
    pub error: Option<&'a str>,
}
