use std::sync::Arc;

use thiserror::Error;

use stockledger_core::OwnerRef;
use stockledger_inventory::{LedgerEntry, NewLedgerEntry, QuantityFilter};

/// Ledger store operation error.
///
/// These are **infrastructure errors** (connectivity, constraints, decoding) as
/// opposed to ledger errors (validation, depletion). The engine never catches or
/// translates them; they reach the caller unchanged.
#[derive(Debug, Error)]
pub enum LedgerStoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("failed to decode ledger row: {0}")]
    Decode(String),

    #[error("async runtime unavailable: {0}")]
    Runtime(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Append-only store of ledger entries, keyed by owner.
///
/// ## Contract
///
/// - `insert` assigns a fresh id larger than every id it handed out before, and
///   stamps `created_at`. Rows are never updated.
/// - `find_current` returns the entry with the largest id for the owner.
/// - `delete_all` physically removes an owner's whole history.
/// - `find_owners_where_current_quantity` is the latest-per-group filter: for
///   each candidate owner only its largest-id entry is compared. Owner ids come
///   back sorted ascending.
///
/// Each call is its own transaction; nothing spans the engine's
/// read/compute/write sequence.
pub trait LedgerStore: Send + Sync {
    fn insert(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerStoreError>;

    /// Delete every entry of the owner; returns the number of rows removed.
    fn delete_all(&self, owner: &OwnerRef) -> Result<u64, LedgerStoreError>;

    fn find_current(&self, owner: &OwnerRef) -> Result<Option<LedgerEntry>, LedgerStoreError>;

    fn find_owners_where_current_quantity(
        &self,
        owner_type: &str,
        filter: QuantityFilter,
        owner_ids: Option<&[String]>,
    ) -> Result<Vec<String>, LedgerStoreError>;

    /// Full history of the owner, newest first.
    fn history(&self, owner: &OwnerRef) -> Result<Vec<LedgerEntry>, LedgerStoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn insert(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerStoreError> {
        (**self).insert(entry)
    }

    fn delete_all(&self, owner: &OwnerRef) -> Result<u64, LedgerStoreError> {
        (**self).delete_all(owner)
    }

    fn find_current(&self, owner: &OwnerRef) -> Result<Option<LedgerEntry>, LedgerStoreError> {
        (**self).find_current(owner)
    }

    fn find_owners_where_current_quantity(
        &self,
        owner_type: &str,
        filter: QuantityFilter,
        owner_ids: Option<&[String]>,
    ) -> Result<Vec<String>, LedgerStoreError> {
        (**self).find_owners_where_current_quantity(owner_type, filter, owner_ids)
    }

    fn history(&self, owner: &OwnerRef) -> Result<Vec<LedgerEntry>, LedgerStoreError> {
        (**self).history(owner)
    }
}
