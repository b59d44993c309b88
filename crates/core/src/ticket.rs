//! Ticket code generation.
//!
//! Codes look like `VT-3F9A0C27B1D4`: a fixed prefix plus twelve uppercase
//! hex digits taken from a random v4 UUID. Uniqueness is ultimately enforced
//! by the `uq_tickets_code` constraint.

use uuid::Uuid;

use crate::error::CoreError;

pub const TICKET_PREFIX: &str = "VT-";
const CODE_HEX_LEN: usize = 12;

pub fn generate_ticket_code() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{TICKET_PREFIX}{}", &hex[..CODE_HEX_LEN])
}

pub fn validate_ticket_code(code: &str) -> Result<(), CoreError> {
    let valid = code
        .strip_prefix(TICKET_PREFIX)
        .is_some_and(|rest| {
            rest.len() == CODE_HEX_LEN
                && rest
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        });
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Malformed ticket code '{code}'")))
    }
}
