//! Bill split arithmetic.
//!
//! Turns a bill total plus a list of participant shares into the exact
//! amount each participant owes. Every strategy guarantees that the
//! resulting amounts sum to the total to the cent.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::{round_cents, validate_amount, validate_non_negative_amount};
use crate::types::{DbId, Money};

/// Maximum number of participants on a single bill.
pub const MAX_PARTICIPANTS_PER_BILL: usize = 100;

/// How a bill total is divided between its participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    Equal,
    Custom,
    Percentage,
}

impl SplitType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Custom => "custom",
            Self::Percentage => "percentage",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "equal" => Ok(Self::Equal),
            "custom" => Ok(Self::Custom),
            "percentage" => Ok(Self::Percentage),
            other => Err(CoreError::Validation(format!(
                "Unknown split type '{other}'. Valid: equal, custom, percentage"
            ))),
        }
    }
}

/// One participant's requested share, as sent by the client.
///
/// `amount` is read for custom splits, `percentage` for percentage splits;
/// both are ignored for equal splits.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareInput {
    pub participant_id: DbId,
    pub amount: Option<Money>,
    pub percentage: Option<Decimal>,
}

/// A computed share ready to be stored on `bill_participants`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub participant_id: DbId,
    pub amount_owed: Money,
    pub percentage: Option<Decimal>,
}

/// Divide `total` between `shares` according to `split_type`.
pub fn compute_split(
    total: Money,
    split_type: SplitType,
    shares: &[ShareInput],
) -> Result<Vec<Share>, CoreError> {
    validate_amount(total)?;
    validate_share_list(shares)?;

    match split_type {
        SplitType::Equal => Ok(split_equal(total, shares)),
        SplitType::Custom => split_custom(total, shares),
        SplitType::Percentage => split_percentage(total, shares),
    }
}

fn validate_share_list(shares: &[ShareInput]) -> Result<(), CoreError> {
    if shares.is_empty() {
        return Err(CoreError::Validation(
            "A bill needs at least one participant".into(),
        ));
    }
    if shares.len() > MAX_PARTICIPANTS_PER_BILL {
        return Err(CoreError::Validation(format!(
            "A bill may have at most {MAX_PARTICIPANTS_PER_BILL} participants"
        )));
    }
    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        if !seen.insert(share.participant_id) {
            return Err(CoreError::Validation(format!(
                "Participant {} appears more than once",
                share.participant_id
            )));
        }
    }
    Ok(())
}

/// Equal split in whole cents. Leftover cents go one each to the first shares.
fn split_equal(total: Money, shares: &[ShareInput]) -> Vec<Share> {
    let total_cents = round_cents(total).mantissa();
    let n = shares.len() as i128;
    let base = total_cents / n;
    let leftover = total_cents % n;

    shares
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let cents = if (i as i128) < leftover { base + 1 } else { base };
            Share {
                participant_id: s.participant_id,
                amount_owed: Decimal::from_i128_with_scale(cents, 2),
                percentage: None,
            }
        })
        .collect()
}

fn split_custom(total: Money, shares: &[ShareInput]) -> Result<Vec<Share>, CoreError> {
    let mut out = Vec::with_capacity(shares.len());
    let mut sum = Decimal::ZERO;

    for s in shares {
        let amount = s.amount.ok_or_else(|| {
            CoreError::Validation(format!(
                "Custom split requires an amount for participant {}",
                s.participant_id
            ))
        })?;
        validate_non_negative_amount(amount)?;
        sum += amount;
        out.push(Share {
            participant_id: s.participant_id,
            amount_owed: round_cents(amount),
            percentage: None,
        });
    }

    if sum != total {
        return Err(CoreError::Validation(format!(
            "Custom amounts sum to {sum} but the bill total is {total}"
        )));
    }
    Ok(out)
}

/// Percentage split using largest-remainder allocation.
///
/// Each share first gets the floor of its exact amount in whole cents. The
/// cents still unallocated (fewer than the number of shares) then go one
/// each to the shares with the largest fractional remainders, earlier shares
/// first on ties. No share can end up negative or above its exact amount
/// plus one cent.
fn split_percentage(total: Money, shares: &[ShareInput]) -> Result<Vec<Share>, CoreError> {
    let mut pct_sum = Decimal::ZERO;
    let mut percentages = Vec::with_capacity(shares.len());
    for s in shares {
        let pct = s.percentage.ok_or_else(|| {
            CoreError::Validation(format!(
                "Percentage split requires a percentage for participant {}",
                s.participant_id
            ))
        })?;
        validate_percentage(pct)?;
        pct_sum += pct;
        percentages.push(pct);
    }

    if pct_sum != Decimal::ONE_HUNDRED {
        return Err(CoreError::Validation(format!(
            "Percentages sum to {pct_sum} but must sum to 100"
        )));
    }

    let total_cents = Decimal::from_i128_with_scale(round_cents(total).mantissa(), 0);
    let mut cents = Vec::with_capacity(shares.len());
    let mut remainders = Vec::with_capacity(shares.len());
    for pct in &percentages {
        let exact = total_cents * *pct / Decimal::ONE_HUNDRED;
        let floor = exact.floor();
        cents.push(floor);
        remainders.push(exact - floor);
    }

    let mut leftover = total_cents - cents.iter().copied().sum::<Decimal>();
    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));
    for i in order {
        if leftover <= Decimal::ZERO {
            break;
        }
        cents[i] += Decimal::ONE;
        leftover -= Decimal::ONE;
    }

    Ok(shares
        .iter()
        .zip(percentages)
        .zip(cents)
        .map(|((s, pct), c)| Share {
            participant_id: s.participant_id,
            amount_owed: round_cents(c / Decimal::ONE_HUNDRED),
            percentage: Some(pct),
        })
        .collect())
}

fn validate_percentage(pct: Decimal) -> Result<(), CoreError> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(CoreError::Validation(format!(
            "Percentage {pct} must be between 0 and 100"
        )));
    }
    if pct.normalize().scale() > 2 {
        return Err(CoreError::Validation(format!(
            "Percentage {pct} has more than 2 decimal places"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;

    fn equal_shares(n: i64) -> Vec<ShareInput> {
        (1..=n)
            .map(|id| ShareInput {
                participant_id: id,
                amount: None,
                percentage: None,
            })
            .collect()
    }

    fn custom(id: DbId, amount: Decimal) -> ShareInput {
        ShareInput {
            participant_id: id,
            amount: Some(amount),
            percentage: None,
        }
    }

    fn pct(id: DbId, percentage: Decimal) -> ShareInput {
        ShareInput {
            participant_id: id,
            amount: None,
            percentage: Some(percentage),
        }
    }

    fn total_of(shares: &[Share]) -> Decimal {
        shares.iter().map(|s| s.amount_owed).sum()
    }

    // -- equal --

    #[test]
    fn equal_split_hundred_among_four() {
        let shares = compute_split(dec!(100.00), SplitType::Equal, &equal_shares(4)).unwrap();
        assert_eq!(shares.len(), 4);
        assert!(shares.iter().all(|s| s.amount_owed == dec!(25.00)));
    }

    #[test]
    fn equal_split_leftover_cents_go_first() {
        let shares = compute_split(dec!(100.00), SplitType::Equal, &equal_shares(3)).unwrap();
        let amounts: Vec<_> = shares.iter().map(|s| s.amount_owed).collect();
        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
        assert_eq!(total_of(&shares), dec!(100.00));
    }

    #[test]
    fn equal_split_sum_is_exact_for_awkward_totals() {
        for n in 1..=13 {
            let shares = compute_split(dec!(10.01), SplitType::Equal, &equal_shares(n)).unwrap();
            assert_eq!(total_of(&shares), dec!(10.01), "n = {n}");
        }
    }

    #[test]
    fn equal_split_single_participant_owes_everything() {
        let shares = compute_split(dec!(42.50), SplitType::Equal, &equal_shares(1)).unwrap();
        assert_eq!(shares[0].amount_owed, dec!(42.50));
    }

    // -- custom --

    #[test]
    fn custom_split_accepts_matching_sum() {
        let input = vec![custom(1, dec!(60)), custom(2, dec!(30.50)), custom(3, dec!(9.50))];
        let shares = compute_split(dec!(100), SplitType::Custom, &input).unwrap();
        assert_eq!(shares[1].amount_owed, dec!(30.50));
        assert_eq!(total_of(&shares), dec!(100));
    }

    #[test]
    fn custom_split_rejects_mismatched_sum() {
        let input = vec![custom(1, dec!(60)), custom(2, dec!(30))];
        assert_matches!(
            compute_split(dec!(100), SplitType::Custom, &input),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn custom_split_requires_amounts() {
        let input = vec![custom(1, dec!(100)), pct(2, dec!(0))];
        assert!(compute_split(dec!(100), SplitType::Custom, &input).is_err());
    }

    #[test]
    fn custom_split_rejects_negative_amounts() {
        let input = vec![custom(1, dec!(110)), custom(2, dec!(-10))];
        assert!(compute_split(dec!(100), SplitType::Custom, &input).is_err());
    }

    // -- percentage --

    #[test]
    fn percentage_split_basic() {
        let input = vec![pct(1, dec!(50)), pct(2, dec!(30)), pct(3, dec!(20))];
        let shares = compute_split(dec!(80), SplitType::Percentage, &input).unwrap();
        let amounts: Vec<_> = shares.iter().map(|s| s.amount_owed).collect();
        assert_eq!(amounts, vec![dec!(40.00), dec!(24.00), dec!(16.00)]);
        assert_eq!(shares[0].percentage, Some(dec!(50)));
    }

    #[test]
    fn percentage_split_leftover_cent_goes_to_largest_remainder() {
        let input = vec![
            pct(1, dec!(33.33)),
            pct(2, dec!(33.33)),
            pct(3, dec!(33.34)),
        ];
        let shares = compute_split(dec!(10.00), SplitType::Percentage, &input).unwrap();
        assert_eq!(total_of(&shares), dec!(10.00));
        assert_eq!(shares[0].amount_owed, dec!(3.33));
        assert_eq!(shares[1].amount_owed, dec!(3.33));
        assert_eq!(shares[2].amount_owed, dec!(3.34));
    }

    #[test]
    fn percentage_split_tiny_total_among_many_never_negative() {
        let input: Vec<_> = (1..=10).map(|id| pct(id, dec!(10))).collect();
        let shares = compute_split(dec!(0.05), SplitType::Percentage, &input).unwrap();
        let amounts: Vec<_> = shares.iter().map(|s| s.amount_owed).collect();
        assert_eq!(
            amounts,
            vec![
                dec!(0.01),
                dec!(0.01),
                dec!(0.01),
                dec!(0.01),
                dec!(0.01),
                dec!(0.00),
                dec!(0.00),
                dec!(0.00),
                dec!(0.00),
                dec!(0.00),
            ]
        );
    }

    /// `n` shares of 100/n percent (two decimals), the last one taking the rest.
    fn even_percentages(n: i64) -> Vec<ShareInput> {
        let each = round_cents(Decimal::ONE_HUNDRED / Decimal::from(n));
        let mut input: Vec<_> = (1..n).map(|id| pct(id, each)).collect();
        let rest = Decimal::ONE_HUNDRED - each * Decimal::from(n - 1);
        input.push(pct(n, rest));
        input
    }

    #[test]
    fn percentage_split_is_non_negative_and_exact_across_sizes() {
        for n in 1..=MAX_PARTICIPANTS_PER_BILL as i64 {
            let input = even_percentages(n);
            for cents in [1_i64, 2, 5, 7, 13, 99, 100, 101, 1001] {
                let total = Decimal::new(cents, 2);
                let shares = compute_split(total, SplitType::Percentage, &input).unwrap();
                assert_eq!(total_of(&shares), total, "n = {n}, total = {total}");
                assert!(
                    shares.iter().all(|s| s.amount_owed >= Decimal::ZERO),
                    "n = {n}, total = {total}"
                );
            }
        }
    }

    #[test]
    fn percentage_split_sum_is_exact() {
        let input = vec![pct(1, dec!(12.5)), pct(2, dec!(12.5)), pct(3, dec!(75))];
        let shares = compute_split(dec!(0.05), SplitType::Percentage, &input).unwrap();
        assert_eq!(total_of(&shares), dec!(0.05));
        assert!(shares.iter().all(|s| s.amount_owed >= Decimal::ZERO));
    }

    #[test]
    fn percentage_split_must_total_hundred() {
        let input = vec![pct(1, dec!(50)), pct(2, dec!(49.99))];
        assert_matches!(
            compute_split(dec!(100), SplitType::Percentage, &input),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn percentage_out_of_range_rejected() {
        let input = vec![pct(1, dec!(150)), pct(2, dec!(-50))];
        assert!(compute_split(dec!(100), SplitType::Percentage, &input).is_err());
    }

    // -- shared validation --

    #[test]
    fn empty_participant_list_rejected() {
        assert_matches!(
            compute_split(dec!(10), SplitType::Equal, &[]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn duplicate_participants_rejected() {
        let input = vec![custom(7, dec!(5)), custom(7, dec!(5))];
        assert!(compute_split(dec!(10), SplitType::Custom, &input).is_err());
    }

    #[test]
    fn non_positive_total_rejected() {
        assert!(compute_split(dec!(0), SplitType::Equal, &equal_shares(2)).is_err());
    }

    #[test]
    fn too_many_participants_rejected() {
        let shares = equal_shares(MAX_PARTICIPANTS_PER_BILL as i64 + 1);
        assert!(compute_split(dec!(1000), SplitType::Equal, &shares).is_err());
    }

    #[test]
    fn split_type_round_trips_through_str() {
        for t in [SplitType::Equal, SplitType::Custom, SplitType::Percentage] {
            assert_eq!(SplitType::parse(t.as_str()).unwrap(), t);
        }
        assert!(SplitType::parse("weighted").is_err());
    }
}
