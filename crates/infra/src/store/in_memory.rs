use std::collections::BTreeMap;
use std::sync::RwLock;

use splitledger_core::{Entity, ExpenseId};
use splitledger_ledger::Expense;

use super::r#trait::{ExpenseStore, StoreError};

/// In-memory expense store.
///
/// Intended for tests/dev. Keyed by UUIDv7 ids, so listing order follows
/// creation order.
#[derive(Debug, Default)]
pub struct InMemoryExpenseStore {
    inner: RwLock<BTreeMap<ExpenseId, Expense>>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("lock poisoned".to_string())
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn list(&self) -> Result<Vec<Expense>, StoreError> {
        let map = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(map.values().cloned().collect())
    }

    fn get(&self, id: ExpenseId) -> Result<Option<Expense>, StoreError> {
        let map = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn save(&self, expense: Expense) -> Result<Expense, StoreError> {
        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        map.insert(*expense.id(), expense.clone());
        Ok(expense)
    }

    fn delete(&self, id: ExpenseId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        map.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }
}
