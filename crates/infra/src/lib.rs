//! Infrastructure layer: expense storage, service wiring, configuration.

pub mod config;
pub mod service;
pub mod store;


pub use config::LedgerConfig;
pub use service::{ExpenseService, ServiceError, ServiceResult};
pub use store::{ExpenseStore, InMemoryExpenseStore, StoreError};
