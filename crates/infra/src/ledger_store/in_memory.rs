use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use stockledger_core::{EntryId, OwnerRef};
use stockledger_inventory::{LedgerEntry, NewLedgerEntry, QuantityFilter};

use super::r#trait::{LedgerStore, LedgerStoreError};

#[derive(Debug, Default)]
struct Inner {
    /// Last id handed out; never reused, even after `delete_all`.
    last_id: u64,
    /// Per-owner history in ascending id order.
    owners: HashMap<OwnerRef, Vec<LedgerEntry>>,
}

/// In-memory append-only ledger store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<Inner>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored entries across all owners.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.owners.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn insert(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerStoreError> {
        let mut inner = self.inner.write().map_err(|_| LedgerStoreError::Poisoned)?;

        inner.last_id += 1;
        let stored = entry.into_entry(EntryId::new(inner.last_id), Utc::now());

        inner
            .owners
            .entry(stored.owner.clone())
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    fn delete_all(&self, owner: &OwnerRef) -> Result<u64, LedgerStoreError> {
        let mut inner = self.inner.write().map_err(|_| LedgerStoreError::Poisoned)?;
        Ok(inner
            .owners
            .remove(owner)
            .map(|history| history.len() as u64)
            .unwrap_or(0))
    }

    fn find_current(&self, owner: &OwnerRef) -> Result<Option<LedgerEntry>, LedgerStoreError> {
        let inner = self.inner.read().map_err(|_| LedgerStoreError::Poisoned)?;
        Ok(inner.owners.get(owner).and_then(|h| h.last()).cloned())
    }

    fn find_owners_where_current_quantity(
        &self,
        owner_type: &str,
        filter: QuantityFilter,
        owner_ids: Option<&[String]>,
    ) -> Result<Vec<String>, LedgerStoreError> {
        let inner = self.inner.read().map_err(|_| LedgerStoreError::Poisoned)?;

        let mut ids: Vec<String> = inner
            .owners
            .iter()
            .filter(|(owner, _)| owner.owner_type() == owner_type)
            .filter(|(owner, _)| {
                owner_ids.is_none_or(|ids| ids.iter().any(|id| id == owner.owner_id()))
            })
            .filter_map(|(owner, history)| {
                // Only the latest entry takes part in the comparison.
                let current = history.last()?;
                filter
                    .matches(current.quantity)
                    .then(|| owner.owner_id().to_string())
            })
            .collect();

        ids.sort();
        Ok(ids)
    }

    fn history(&self, owner: &OwnerRef) -> Result<Vec<LedgerEntry>, LedgerStoreError> {
        let inner = self.inner.read().map_err(|_| LedgerStoreError::Poisoned)?;
        Ok(inner
            .owners
            .get(owner)
            .map(|h| h.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}
