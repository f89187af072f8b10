//! Inventory ledger domain.
//!
//! Business rules for per-owner stock ledgers, implemented as deterministic
//! domain logic (no IO, no storage). The engine in `stockledger-infra` reads the
//! current entry, asks a [`LedgerCommand`] for the next quantity, and writes it.

pub mod command;
pub mod entry;
pub mod event;
pub mod level;
pub mod query;

pub use command::LedgerCommand;
pub use entry::{LEDGER_ENTRY_MODEL, LedgerEntry, NewLedgerEntry, ensure_entry_model};
pub use event::InventoryUpdated;
pub use level::StockLevel;
pub use query::{Comparison, QuantityFilter};
