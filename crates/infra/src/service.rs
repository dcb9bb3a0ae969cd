//! Expense service: validation + persistence around the pure ledger core.

use std::collections::BTreeSet;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, instrument};

use splitledger_core::{DomainError, ExpenseId, PersonId};
use splitledger_ledger::{
    Balances, Expense, NewExpense, Settlement, balance_residual, compute_balances,
    compute_settlements,
};

use crate::config::LedgerConfig;
use crate::store::{ExpenseStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Store(StoreError::NotFound(_)))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Records expenses and answers balance/settlement queries over a store snapshot.
#[derive(Debug)]
pub struct ExpenseService<S> {
    store: S,
    config: LedgerConfig,
}

impl<S> ExpenseService<S>
where
    S: ExpenseStore,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip_all, fields(paid_by = %input.paid_by))]
    pub fn create_expense(&self, input: NewExpense) -> ServiceResult<Expense> {
        let expense = Expense::record(
            ExpenseId::new(),
            input,
            self.config.split_validation,
            Utc::now(),
        )?;
        let saved = self.store.save(expense)?;

        info!(expense = %saved.id_typed(), amount = %saved.amount(), "expense created");
        Ok(saved)
    }

    #[instrument(skip(self, input))]
    pub fn update_expense(&self, id: ExpenseId, input: NewExpense) -> ServiceResult<Expense> {
        let existing = self.store.get(id)?.ok_or(StoreError::NotFound(id))?;
        let revised = existing.revise(input, self.config.split_validation, Utc::now())?;
        let saved = self.store.save(revised)?;

        info!(expense = %id, amount = %saved.amount(), "expense updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub fn delete_expense(&self, id: ExpenseId) -> ServiceResult<()> {
        self.store.delete(id)?;
        info!(expense = %id, "expense deleted");
        Ok(())
    }

    pub fn get_expense(&self, id: ExpenseId) -> ServiceResult<Expense> {
        Ok(self.store.get(id)?.ok_or(StoreError::NotFound(id))?)
    }

    pub fn list_expenses(&self) -> ServiceResult<Vec<Expense>> {
        Ok(self.store.list()?)
    }

    /// Net balance per person over the current snapshot.
    pub fn balances(&self) -> ServiceResult<Balances> {
        let snapshot = self.store.list()?;
        let balances = compute_balances(&snapshot);

        let residual = balance_residual(&balances);
        if !residual.is_zero() {
            debug!(%residual, "balances do not net to zero");
        }
        Ok(balances)
    }

    /// Payments that settle the current balances.
    pub fn settlements(&self) -> ServiceResult<Vec<Settlement>> {
        let balances = self.balances()?;
        Ok(compute_settlements(&balances))
    }

    /// Everyone who paid for or took part in any expense, sorted.
    pub fn people(&self) -> ServiceResult<BTreeSet<PersonId>> {
        let snapshot = self.store.list()?;
        Ok(snapshot
            .iter()
            .flat_map(|e| e.people().cloned())
            .collect())
    }
}
