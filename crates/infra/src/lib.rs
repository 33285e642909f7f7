//! Infrastructure layer: persistence adapters for the ledger.

pub mod ledger_store;

pub use ledger_store::{InMemoryLedgerStore, LedgerStore, PostgresLedgerStore, StoreError};
