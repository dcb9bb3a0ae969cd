//! Settlement planning: greedy debtor → creditor matching.

use serde::{Deserialize, Serialize};
use tracing::debug;

use splitledger_core::{Money, PersonId, ValueObject};

use crate::balance::Balances;

/// A proposed payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: PersonId,
    pub to: PersonId,
    /// Always positive.
    pub amount: Money,
}

impl ValueObject for Settlement {}

/// Plan payments that zero out `balances`.
///
/// Debtors are visited in map order; each pays creditors, also in map order,
/// `min(remaining debt, remaining credit)` until the debt is cleared. This is a
/// greedy matching, not a minimum-transaction solver. People at exactly zero
/// take no part. If rounding drift leaves debt and credit unequal, the excess
/// on the larger side is left unsettled.
pub fn compute_settlements(balances: &Balances) -> Vec<Settlement> {
    let debtors: Vec<(&PersonId, Money)> = balances
        .iter()
        .filter(|(_, b)| b.is_negative())
        .map(|(p, b)| (p, b.abs()))
        .collect();
    let mut creditors: Vec<(&PersonId, Money)> = balances
        .iter()
        .filter(|(_, b)| b.is_positive())
        .map(|(p, b)| (p, *b))
        .collect();

    let mut settlements = Vec::new();

    for (debtor, debt) in debtors {
        let mut remaining = debt;

        for (creditor, credit) in creditors.iter_mut() {
            if remaining.is_zero() {
                break;
            }
            if !credit.is_positive() {
                continue;
            }

            let amount = remaining.min(*credit);
            settlements.push(Settlement {
                from: debtor.clone(),
                to: (*creditor).clone(),
                amount,
            });

            remaining -= amount;
            *credit -= amount;
        }

        if !remaining.is_zero() {
            debug!(debtor = %debtor, %remaining, "debt left unsettled, no credit remaining");
        }
    }

    debug!(settlements = settlements.len(), "computed settlements");
    settlements
}
