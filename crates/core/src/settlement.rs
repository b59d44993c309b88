//! Bill settlement state: completion gating and payment summaries.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Money};

/// The per-participant flags that drive settlement decisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticipantState {
    pub amount_owed: Money,
    pub is_paid: bool,
    pub is_confirmed: bool,
}

/// Aggregated payment status for one bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillSummary {
    pub participant_count: usize,
    pub total_owed: Money,
    pub total_paid: Money,
    pub outstanding: Money,
    pub paid_count: usize,
    pub confirmed_count: usize,
    pub all_paid: bool,
    pub all_confirmed: bool,
}

/// Whether `requester` may mark the bill complete.
///
/// The creator can always complete their own bill. Anyone else needs every
/// participant to have confirmed their share; a bill with no participants
/// can only be completed by its creator.
pub fn can_complete(requester: DbId, creator: DbId, states: &[ParticipantState]) -> bool {
    if requester == creator {
        return true;
    }
    !states.is_empty() && states.iter().all(|s| s.is_confirmed)
}

/// Validate a completion request, returning the reason it is refused.
pub fn check_completion(
    requester: DbId,
    creator: DbId,
    already_completed: bool,
    states: &[ParticipantState],
) -> Result<(), CoreError> {
    if already_completed {
        return Err(CoreError::Conflict("Bill is already completed".into()));
    }
    if !can_complete(requester, creator, states) {
        let pending = states.iter().filter(|s| !s.is_confirmed).count();
        return Err(CoreError::Forbidden(format!(
            "Bill cannot be completed: {pending} participant(s) have not confirmed"
        )));
    }
    Ok(())
}

/// Reject share mutations on a bill that has been completed.
pub fn ensure_open(is_completed: bool) -> Result<(), CoreError> {
    if is_completed {
        Err(CoreError::Conflict(
            "Bill is completed and can no longer be changed".into(),
        ))
    } else {
        Ok(())
    }
}

/// Summarise payment and confirmation status across all shares.
pub fn summarize(states: &[ParticipantState]) -> BillSummary {
    let total_owed: Decimal = states.iter().map(|s| s.amount_owed).sum();
    let total_paid: Decimal = states
        .iter()
        .filter(|s| s.is_paid)
        .map(|s| s.amount_owed)
        .sum();
    let paid_count = states.iter().filter(|s| s.is_paid).count();
    let confirmed_count = states.iter().filter(|s| s.is_confirmed).count();

    BillSummary {
        participant_count: states.len(),
        total_owed,
        total_paid,
        outstanding: total_owed - total_paid,
        paid_count,
        confirmed_count,
        all_paid: paid_count == states.len(),
        all_confirmed: confirmed_count == states.len(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;

    fn state(amount: Decimal, is_paid: bool, is_confirmed: bool) -> ParticipantState {
        ParticipantState {
            amount_owed: amount,
            is_paid,
            is_confirmed,
        }
    }

    #[test]
    fn creator_can_always_complete() {
        let states = vec![state(dec!(10), false, false)];
        assert!(can_complete(1, 1, &states));
        assert!(can_complete(1, 1, &[]));
    }

    #[test]
    fn non_creator_needs_all_confirmed() {
        let partial = vec![state(dec!(10), true, true), state(dec!(10), false, false)];
        assert!(!can_complete(2, 1, &partial));

        let all = vec![state(dec!(10), false, true), state(dec!(10), false, true)];
        assert!(can_complete(2, 1, &all));
    }

    #[test]
    fn non_creator_cannot_complete_empty_bill() {
        assert!(!can_complete(2, 1, &[]));
    }

    #[test]
    fn check_completion_reports_pending_count() {
        let states = vec![
            state(dec!(5), false, true),
            state(dec!(5), false, false),
            state(dec!(5), false, false),
        ];
        let err = check_completion(2, 1, false, &states).unwrap_err();
        assert_matches!(err, CoreError::Forbidden(ref msg) if msg.contains("2 participant"));
    }

    #[test]
    fn check_completion_rejects_completed_bill() {
        assert_matches!(
            check_completion(1, 1, true, &[]),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn ensure_open_guards_completed_bills() {
        assert!(ensure_open(false).is_ok());
        assert_matches!(ensure_open(true), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn summary_totals() {
        let states = vec![
            state(dec!(25.00), true, true),
            state(dec!(25.00), false, true),
            state(dec!(50.00), false, false),
        ];
        let summary = summarize(&states);
        assert_eq!(summary.participant_count, 3);
        assert_eq!(summary.total_owed, dec!(100.00));
        assert_eq!(summary.total_paid, dec!(25.00));
        assert_eq!(summary.outstanding, dec!(75.00));
        assert_eq!(summary.paid_count, 1);
        assert_eq!(summary.confirmed_count, 2);
        assert!(!summary.all_paid);
        assert!(!summary.all_confirmed);
    }

    #[test]
    fn summary_of_empty_bill() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_owed, Decimal::ZERO);
        assert!(summary.all_paid);
        assert!(summary.all_confirmed);
    }
}
