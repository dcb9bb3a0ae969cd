//! Expense persistence boundary.
//!
//! The ledger core never touches storage; callers read a snapshot through
//! this trait and pass it in.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryExpenseStore;
pub use r#trait::{ExpenseStore, StoreError};
