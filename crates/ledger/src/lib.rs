//! Shared-expense ledger arithmetic.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns. Data flows
//! one way: expenses → shares → balances → settlements.

pub mod balance;
pub mod expense;
pub mod settlement;
pub mod split;

pub use balance::{Balances, balance_residual, compute_balances};
pub use expense::{Expense, NewExpense, SplitShare, SplitType};
pub use settlement::{Settlement, compute_settlements};
pub use split::{SplitValidation, compute_shares, compute_shares_with};
