//! Append-only ledger store boundary.
//!
//! The engine talks to storage only through [`LedgerStore`]; the in-memory store
//! backs tests and dev, the Postgres store backs deployments.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;
pub use r#trait::{LedgerStore, LedgerStoreError};
