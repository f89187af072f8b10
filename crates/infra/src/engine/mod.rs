//! Inventory ledger engine (application-level orchestration).
//!
//! Every mutation runs the same pipeline:
//!
//! ```text
//! validate arguments (no store access on failure)
//!   ↓
//! read current entry (LedgerStore::find_current)
//!   ↓
//! decide next quantity (LedgerCommand::decide, pure)
//!   ↓
//! insert new entry (LedgerStore::insert)
//!   ↓
//! notify sink (InventoryUpdated, only after the insert returned)
//! ```
//!
//! Store errors pass through untouched as [`EngineError::Store`]. Sink failures
//! are logged and swallowed: the entry is already written and notification is
//! fire-and-forget.

pub mod locks;
pub mod owner;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use stockledger_core::{HasOwnerRef, LedgerError, OwnerRef, OwnerTypeRegistry};
use stockledger_events::EventSink;
use stockledger_inventory::{
    Comparison, InventoryUpdated, LedgerCommand, LedgerEntry, NewLedgerEntry, QuantityFilter,
    StockLevel,
};

use crate::config::{ConfigError, LedgerConfig};
use crate::ledger_store::{LedgerStore, LedgerStoreError};

pub use locks::OwnerLocks;
pub use owner::OwnerInventory;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Validation or state rejection; nothing was written.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The store failed; propagated unchanged.
    #[error(transparent)]
    Store(#[from] LedgerStoreError),
}

impl EngineError {
    pub fn ledger(&self) -> Option<&LedgerError> {
        match self {
            EngineError::Ledger(e) => Some(e),
            EngineError::Store(_) => None,
        }
    }
}

/// Result of [`InventoryLedger::clear`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// History removed; the owner has no entries.
    Cleared,
    /// History removed and a fresh entry written.
    Restocked(LedgerEntry),
}

impl ClearOutcome {
    pub fn into_entry(self) -> Option<LedgerEntry> {
        match self {
            ClearOutcome::Cleared => None,
            ClearOutcome::Restocked(entry) => Some(entry),
        }
    }
}

/// Append-only inventory ledger over a [`LedgerStore`], notifying an [`EventSink`].
pub struct InventoryLedger<S, K> {
    store: S,
    sink: K,
    registry: OwnerTypeRegistry,
    locks: Option<OwnerLocks>,
    config: LedgerConfig,
}

impl<S, K> core::fmt::Debug for InventoryLedger<S, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryLedger")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<S, K> InventoryLedger<S, K>
where
    S: LedgerStore,
    K: EventSink<InventoryUpdated>,
{
    /// Wire a ledger; fails if the configuration does not validate.
    pub fn new(store: S, sink: K, config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let locks = config.serialize_per_owner.then(OwnerLocks::new);
        Ok(Self {
            store,
            sink,
            registry: OwnerTypeRegistry::new(),
            locks,
            config,
        })
    }

    pub fn with_registry(mut self, registry: OwnerTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &OwnerTypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Resolve an application entity to its ledger owner reference.
    pub fn owner_of<T: HasOwnerRef>(&self, entity: &T) -> OwnerRef {
        self.registry.owner_ref(entity)
    }

    /// Ledger operations bound to one entity.
    pub fn for_owner<T: HasOwnerRef>(&self, entity: &T) -> OwnerInventory<'_, S, K> {
        OwnerInventory::new(self, self.owner_of(entity))
    }

    pub fn for_ref(&self, owner: OwnerRef) -> OwnerInventory<'_, S, K> {
        OwnerInventory::new(self, owner)
    }

    // ---- reads -------------------------------------------------------------

    /// Entry with the largest id for the owner, if any.
    pub fn current_entry(&self, owner: &OwnerRef) -> Result<Option<LedgerEntry>, EngineError> {
        Ok(self.store.find_current(owner)?)
    }

    /// Full history, newest first.
    pub fn history(&self, owner: &OwnerRef) -> Result<Vec<LedgerEntry>, EngineError> {
        Ok(self.store.history(owner)?)
    }

    pub fn has_history(&self, owner: &OwnerRef) -> Result<bool, EngineError> {
        Ok(self.current_entry(owner)?.is_some())
    }

    pub fn stock_level(&self, owner: &OwnerRef) -> Result<StockLevel, EngineError> {
        Ok(StockLevel::of(self.current_entry(owner)?.as_ref()))
    }

    /// Current quantity is at least `min_quantity`; false without history.
    pub fn is_stocked(&self, owner: &OwnerRef, min_quantity: i64) -> Result<bool, EngineError> {
        Ok(self.stock_level(owner)?.is_stocked(min_quantity))
    }

    /// `is_stocked(owner, 1)`.
    pub fn is_in_stock(&self, owner: &OwnerRef) -> Result<bool, EngineError> {
        self.is_stocked(owner, 1)
    }

    /// No history, or current quantity ≤ 0.
    pub fn is_depleted(&self, owner: &OwnerRef) -> Result<bool, EngineError> {
        Ok(self.stock_level(owner)?.is_depleted())
    }

    // ---- writes ------------------------------------------------------------

    #[instrument(skip_all, fields(owner = %owner, quantity = quantity))]
    pub fn set_quantity(
        &self,
        owner: &OwnerRef,
        quantity: i64,
        description: Option<String>,
    ) -> Result<LedgerEntry, EngineError> {
        self.apply(owner, LedgerCommand::set(quantity, description))
    }

    #[instrument(skip_all, fields(owner = %owner, delta = delta))]
    pub fn add_quantity(
        &self,
        owner: &OwnerRef,
        delta: i64,
        description: Option<String>,
    ) -> Result<LedgerEntry, EngineError> {
        self.apply(owner, LedgerCommand::add(delta, description))
    }

    /// `add_quantity(owner, 1, None)`.
    pub fn increment(&self, owner: &OwnerRef) -> Result<LedgerEntry, EngineError> {
        self.add_quantity(owner, 1, None)
    }

    /// Subtract `|delta|`; the sign of `delta` is ignored.
    #[instrument(skip_all, fields(owner = %owner, delta = delta))]
    pub fn subtract_quantity(
        &self,
        owner: &OwnerRef,
        delta: i64,
        description: Option<String>,
    ) -> Result<LedgerEntry, EngineError> {
        self.apply(owner, LedgerCommand::subtract(delta, description))
    }

    /// `subtract_quantity(owner, 1, None)`.
    pub fn decrement(&self, owner: &OwnerRef) -> Result<LedgerEntry, EngineError> {
        self.subtract_quantity(owner, 1, None)
    }

    /// Delete the owner's whole history (irreversible).
    ///
    /// With `restock = Some(q)` and `q >= 0`, immediately sets `q` (notifying with
    /// no previous entry). A negative restock only clears.
    #[instrument(skip_all, fields(owner = %owner, restock = ?restock))]
    pub fn clear(&self, owner: &OwnerRef, restock: Option<i64>) -> Result<ClearOutcome, EngineError> {
        self.serialized(owner, || -> Result<ClearOutcome, EngineError> {
            let removed = self.store.delete_all(owner)?;
            debug!(removed, "ledger history cleared");

            match restock {
                Some(quantity) if quantity >= 0 => {
                    let entry = self.apply_unlocked(owner, LedgerCommand::set(quantity, None))?;
                    Ok(ClearOutcome::Restocked(entry))
                }
                _ => Ok(ClearOutcome::Cleared),
            }
        })
    }

    // ---- queries -----------------------------------------------------------

    /// Owners of `owner_type` whose current quantity satisfies
    /// `current <comparison> quantity`, optionally restricted to `owner_ids`.
    ///
    /// An empty `owner_ids` slice applies no restriction, same as `None`.
    pub fn query_by_quantity(
        &self,
        owner_type: &str,
        quantity: i64,
        comparison: Comparison,
        owner_ids: Option<&[String]>,
    ) -> Result<Vec<OwnerRef>, EngineError> {
        let filter = QuantityFilter::new(quantity, comparison);
        let owner_ids = owner_ids.filter(|ids| !ids.is_empty());
        let ids = self
            .store
            .find_owners_where_current_quantity(owner_type, filter, owner_ids)?;
        Ok(ids
            .into_iter()
            .map(|id| OwnerRef::new(owner_type, id))
            .collect())
    }

    /// `query_by_quantity` with `<>`.
    pub fn query_by_quantity_not(
        &self,
        owner_type: &str,
        quantity: i64,
        owner_ids: Option<&[String]>,
    ) -> Result<Vec<OwnerRef>, EngineError> {
        self.query_by_quantity(owner_type, quantity, Comparison::Ne, owner_ids)
    }

    // ---- pipeline ----------------------------------------------------------

    fn apply(&self, owner: &OwnerRef, command: LedgerCommand) -> Result<LedgerEntry, EngineError> {
        command.validate()?;
        self.serialized(owner, || self.apply_unlocked(owner, command))
    }

    fn apply_unlocked(
        &self,
        owner: &OwnerRef,
        command: LedgerCommand,
    ) -> Result<LedgerEntry, EngineError> {
        let previous = self.store.find_current(owner)?;
        let quantity = command.decide(previous.as_ref())?;
        let kind = command.kind();

        let entry = NewLedgerEntry::new(owner.clone(), quantity, command.into_description())?;
        let stored = self.store.insert(entry)?;
        debug!(command = kind, entry_id = %stored.id, quantity, "ledger entry written");

        self.notify(owner, previous, stored.clone());
        Ok(stored)
    }

    fn notify(&self, owner: &OwnerRef, previous: Option<LedgerEntry>, current: LedgerEntry) {
        let event = InventoryUpdated::new(owner.clone(), previous, current);
        if let Err(err) = self.sink.publish(event) {
            warn!(owner = %owner, ?err, "inventory update notification failed");
        }
    }

    fn serialized<R>(&self, owner: &OwnerRef, f: impl FnOnce() -> R) -> R {
        match &self.locks {
            Some(locks) => locks.run(owner, f),
            None => f(),
        }
    }
}
