//! Net balances per person.

use std::collections::BTreeMap;

use tracing::debug;

use splitledger_core::{Money, PersonId};

use crate::expense::Expense;

/// Net position per person: positive is owed money, negative owes money.
///
/// Ordered by person so settlement planning is deterministic.
pub type Balances = BTreeMap<PersonId, Money>;

/// Derive net balances from a snapshot of expenses.
///
/// Each expense credits its payer with the full amount and debits every share
/// holder with their share.
pub fn compute_balances<'a, I>(expenses: I) -> Balances
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut balances = Balances::new();
    let mut count = 0usize;

    for expense in expenses {
        count += 1;
        *balances.entry(expense.paid_by().clone()).or_default() += expense.amount();

        for share in expense.shares() {
            *balances.entry(share.person.clone()).or_default() -= share.owed();
        }
    }

    debug!(
        expenses = count,
        people = balances.len(),
        residual = %balance_residual(&balances),
        "computed balances"
    );
    balances
}

/// Sum of all balances; zero unless split rounding drift or unbalanced splits are present.
pub fn balance_residual(balances: &Balances) -> Money {
    balances.values().sum()
}
