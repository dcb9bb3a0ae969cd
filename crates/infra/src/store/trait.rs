use std::sync::Arc;

use thiserror::Error;

use splitledger_core::ExpenseId;
use splitledger_ledger::Expense;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("expense not found: {0}")]
    NotFound(ExpenseId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable collection of expense records.
///
/// Implementations hand out owned copies; nothing returned here aliases the
/// store's internal state.
pub trait ExpenseStore: Send + Sync {
    /// All expenses, oldest first.
    fn list(&self) -> Result<Vec<Expense>, StoreError>;

    fn get(&self, id: ExpenseId) -> Result<Option<Expense>, StoreError>;

    /// Insert or replace the record with the expense's id.
    fn save(&self, expense: Expense) -> Result<Expense, StoreError>;

    /// Remove a record. Unknown ids are `StoreError::NotFound`.
    fn delete(&self, id: ExpenseId) -> Result<(), StoreError>;
}

impl<S> ExpenseStore for Arc<S>
where
    S: ExpenseStore + ?Sized,
{
    fn list(&self) -> Result<Vec<Expense>, StoreError> {
        (**self).list()
    }

    fn get(&self, id: ExpenseId) -> Result<Option<Expense>, StoreError> {
        (**self).get(id)
    }

    fn save(&self, expense: Expense) -> Result<Expense, StoreError> {
        (**self).save(expense)
    }

    fn delete(&self, id: ExpenseId) -> Result<(), StoreError> {
        (**self).delete(id)
    }
}
