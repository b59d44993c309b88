//! Field-level input validation shared by both applications.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Pragmatic email shape check: one `@`, no whitespace, a dotted domain.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
});

/// Maximum length of a person or display name.
pub const MAX_NAME_LEN: usize = 100;
/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;
/// Maximum length of an event comment.
pub const MAX_COMMENT_LEN: usize = 2000;
/// Minimum password length for new accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.len() > MAX_EMAIL_LEN || !EMAIL_RE.is_match(email) {
        return Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        )));
    }
    Ok(())
}

/// Lowercase and trim an email so lookups and unique constraints agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    validate_text(field, value, MAX_NAME_LEN)
}

pub fn validate_comment_body(body: &str) -> Result<(), CoreError> {
    validate_text("comment", body, MAX_COMMENT_LEN)
}

/// Reject blank strings and strings longer than `max` characters.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}
