//! Split calculation: one expense → per-person owed amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use splitledger_core::{DomainError, DomainResult, Money, PersonId};

use crate::expense::{Expense, SplitShare, SplitType};

/// How strictly split inputs are checked against the expense total.
///
/// `Permissive` accepts percentages that do not add up to 100 and exact amounts
/// that do not add up to the expense total; the resulting shares then do not
/// balance the payer's credit. `Strict` rejects both as `InvalidSplit`.
/// EQUAL rounding drift is accepted in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitValidation {
    #[default]
    Permissive,
    Strict,
}

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Calculate the shares of `expense` with permissive validation.
pub fn compute_shares(expense: &Expense) -> DomainResult<Vec<SplitShare>> {
    compute_shares_with(expense, SplitValidation::Permissive)
}

/// Calculate the shares of `expense`.
///
/// Pure: the expense is not modified; callers store the result as the new
/// share list. Running it again on the result yields the same shares.
pub fn compute_shares_with(
    expense: &Expense,
    validation: SplitValidation,
) -> DomainResult<Vec<SplitShare>> {
    let amount = expense.amount();
    let shares = match expense.split_type() {
        SplitType::Equal => equal_shares(amount, expense.participants())?,
        SplitType::Percentage => percentage_shares(amount, expense.shares(), validation)?,
        SplitType::ExactAmount => exact_shares(amount, expense.shares(), validation)?,
    };

    let allocated: Money = shares.iter().map(SplitShare::owed).sum();
    let residual = amount - allocated;
    if !residual.is_zero() {
        match expense.split_type() {
            // Accepted rounding drift, never redistributed.
            SplitType::Equal => debug!(%amount, %allocated, "equal split rounding drift"),
            _ => warn!(
                split_type = ?expense.split_type(),
                %amount,
                %allocated,
                "split shares do not add up to the expense amount"
            ),
        }
    }

    debug!(split_type = ?expense.split_type(), shares = shares.len(), "computed shares");
    Ok(shares)
}

fn equal_shares(amount: Money, participants: &[PersonId]) -> DomainResult<Vec<SplitShare>> {
    if participants.is_empty() {
        return Err(DomainError::invalid_split(
            "equal split requires at least one participant",
        ));
    }

    let count = Decimal::from(participants.len());
    let each = amount
        .as_decimal()
        .checked_div(count)
        .map(|v| Money::from_decimal(v).round_currency())
        .ok_or_else(|| DomainError::invalid_split(format!("cannot divide {amount} equally")))?;

    Ok(participants
        .iter()
        .map(|person| SplitShare::with_amount(person.clone(), each))
        .collect())
}

fn percentage_shares(
    amount: Money,
    inputs: &[SplitShare],
    validation: SplitValidation,
) -> DomainResult<Vec<SplitShare>> {
    if inputs.is_empty() {
        return Err(DomainError::invalid_split(
            "percentage split requires at least one share",
        ));
    }

    let mut total_pct = Decimal::ZERO;
    let mut shares = Vec::with_capacity(inputs.len());
    for input in inputs {
        let pct = input.percentage.ok_or_else(|| {
            DomainError::invalid_split(format!("share for '{}' has no percentage", input.person))
        })?;
        total_pct = total_pct
            .checked_add(pct)
            .ok_or_else(|| DomainError::invalid_split("percentages are out of range"))?;

        let owed = amount
            .as_decimal()
            .checked_mul(pct)
            .and_then(|v| v.checked_div(ONE_HUNDRED))
            .map(|v| Money::from_decimal(v).round_currency())
            .filter(|owed| !owed.exceeds_limit())
            .ok_or_else(|| {
                DomainError::invalid_split(format!(
                    "{pct}% of {amount} for '{}' is out of range",
                    input.person
                ))
            })?;
        shares.push(SplitShare {
            person: input.person.clone(),
            amount: Some(owed),
            percentage: Some(pct),
        });
    }

    if validation == SplitValidation::Strict && total_pct != ONE_HUNDRED {
        return Err(DomainError::invalid_split(format!(
            "percentages add up to {total_pct}, expected 100"
        )));
    }

    Ok(shares)
}

fn exact_shares(
    amount: Money,
    inputs: &[SplitShare],
    validation: SplitValidation,
) -> DomainResult<Vec<SplitShare>> {
    if let Some(missing) = inputs.iter().find(|s| s.amount.is_none()) {
        return Err(DomainError::invalid_split(format!(
            "share for '{}' has no amount",
            missing.person
        )));
    }

    if validation == SplitValidation::Strict {
        let total: Money = inputs.iter().map(SplitShare::owed).sum();
        if total != amount {
            return Err(DomainError::invalid_split(format!(
                "exact shares add up to {total}, expected {amount}"
            )));
        }
    }

    Ok(inputs.to_vec())
}
