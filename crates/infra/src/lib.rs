//! Infrastructure layer: ledger storage, the ledger engine, and configuration.

pub mod config;
pub mod engine;
pub mod ledger_store;


pub use config::{ConfigError, LedgerConfig};
pub use engine::{ClearOutcome, EngineError, InventoryLedger, OwnerInventory, OwnerLocks};
pub use ledger_store::{InMemoryLedgerStore, LedgerStore, LedgerStoreError, PostgresLedgerStore};
