use stockledger_core::OwnerRef;
use stockledger_events::EventSink;
use stockledger_inventory::{InventoryUpdated, LedgerEntry, StockLevel};

use super::{ClearOutcome, EngineError, InventoryLedger};
use crate::ledger_store::LedgerStore;

/// Ledger operations bound to one owner.
///
/// Obtained from [`InventoryLedger::for_owner`] or [`InventoryLedger::for_ref`];
/// every call forwards to the engine with this owner.
#[derive(Debug)]
pub struct OwnerInventory<'a, S, K> {
    ledger: &'a InventoryLedger<S, K>,
    owner: OwnerRef,
}

impl<'a, S, K> OwnerInventory<'a, S, K>
where
    S: LedgerStore,
    K: EventSink<InventoryUpdated>,
{
    pub(crate) fn new(ledger: &'a InventoryLedger<S, K>, owner: OwnerRef) -> Self {
        Self { ledger, owner }
    }

    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    pub fn current(&self) -> Result<Option<LedgerEntry>, EngineError> {
        self.ledger.current_entry(&self.owner)
    }

    pub fn history(&self) -> Result<Vec<LedgerEntry>, EngineError> {
        self.ledger.history(&self.owner)
    }

    pub fn has_history(&self) -> Result<bool, EngineError> {
        self.ledger.has_history(&self.owner)
    }

    pub fn level(&self) -> Result<StockLevel, EngineError> {
        self.ledger.stock_level(&self.owner)
    }

    pub fn is_stocked(&self, min_quantity: i64) -> Result<bool, EngineError> {
        self.ledger.is_stocked(&self.owner, min_quantity)
    }

    pub fn is_in_stock(&self) -> Result<bool, EngineError> {
        self.ledger.is_in_stock(&self.owner)
    }

    pub fn is_depleted(&self) -> Result<bool, EngineError> {
        self.ledger.is_depleted(&self.owner)
    }

    pub fn set(&self, quantity: i64, description: Option<String>) -> Result<LedgerEntry, EngineError> {
        self.ledger.set_quantity(&self.owner, quantity, description)
    }

    pub fn add(&self, delta: i64, description: Option<String>) -> Result<LedgerEntry, EngineError> {
        self.ledger.add_quantity(&self.owner, delta, description)
    }

    pub fn subtract(&self, delta: i64, description: Option<String>) -> Result<LedgerEntry, EngineError> {
        self.ledger.subtract_quantity(&self.owner, delta, description)
    }

    pub fn increment(&self) -> Result<LedgerEntry, EngineError> {
        self.ledger.increment(&self.owner)
    }

    pub fn decrement(&self) -> Result<LedgerEntry, EngineError> {
        self.ledger.decrement(&self.owner)
    }

    pub fn clear(&self, restock: Option<i64>) -> Result<ClearOutcome, EngineError> {
        self.ledger.clear(&self.owner, restock)
    }
}
