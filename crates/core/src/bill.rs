//! Bill-level constants and field validation.

use crate::error::CoreError;
use crate::validation::validate_text;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Categories offered by the bill form.
pub const CATEGORIES: &[&str] = &[
    "food",
    "travel",
    "housing",
    "utilities",
    "entertainment",
    "shopping",
    "other",
];

/// Category used when a bill is created without one.
pub const DEFAULT_CATEGORY: &str = "other";

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    validate_text("title", title, MAX_TITLE_LEN)
}

pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(CoreError::Validation(
            format!("description must be at most {MAX_DESCRIPTION_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown category '{category}'. Valid: {}",
            CATEGORIES.join(", ")
        )))
    }
}
