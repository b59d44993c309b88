//! Monetary amount and currency validation.
//!
//! Every amount stored by ShareEase and Ventopia is a [`Money`] value with
//! two fractional digits. Helpers here normalise arbitrary decimals to
//! cents and reject input that cannot be represented that way.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;
use crate::types::Money;

/// Number of fractional digits kept for every amount.
pub const CENT_SCALE: u32 = 2;

/// Largest total accepted for a bill or ticket price: 9_999_999_999.99, the
/// ceiling of a `NUMERIC(12,2)` column.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Default currency when a request omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Round to cents (half away from zero) and fix the scale at two digits.
pub fn round_cents(amount: Money) -> Money {
    let mut rounded =
        amount.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CENT_SCALE);
    rounded
}

/// Whether `amount` has no more than two significant fractional digits.
pub fn has_cent_precision(amount: Money) -> bool {
    amount.normalize().scale() <= CENT_SCALE
}

/// Validate a total that must be strictly positive.
pub fn validate_amount(amount: Money) -> Result<(), CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::Validation(
            "Amount must be greater than zero".into(),
        ));
    }
    validate_non_negative_amount(amount)
}

/// Validate an amount that may be zero (custom shares, free tickets).
pub fn validate_non_negative_amount(amount: Money) -> Result<(), CoreError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::Validation("Amount must not be negative".into()));
    }
    if !has_cent_precision(amount) {
        return Err(CoreError::Validation(format!(
            "Amount {amount} has more than {CENT_SCALE} decimal places"
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(CoreError::Validation(format!(
            "Amount must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

/// Validate an ISO-4217 shaped currency code: exactly three uppercase ASCII letters.
pub fn validate_currency(code: &str) -> Result<(), CoreError> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid currency code '{code}': expected three uppercase letters"
        )))
    }
}

/// Resolve an optional currency from a request, uppercasing and validating it.
pub fn normalize_currency(code: Option<&str>) -> Result<String, CoreError> {
    let code = code
        .map(|c| c.trim().to_ascii_uppercase())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    validate_currency(&code)?;
    Ok(code)
}
