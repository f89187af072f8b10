use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockledger_core::OwnerRef;
use stockledger_events::Event;

use crate::entry::LedgerEntry;

/// Event: InventoryUpdated.
///
/// Emitted once per successful write, after the new entry is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUpdated {
    pub event_id: Uuid,
    pub owner: OwnerRef,
    /// Current entry before the write; `None` for an owner without history.
    pub previous: Option<LedgerEntry>,
    pub current: LedgerEntry,
    pub occurred_at: DateTime<Utc>,
}

impl InventoryUpdated {
    pub fn new(owner: OwnerRef, previous: Option<LedgerEntry>, current: LedgerEntry) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            owner,
            occurred_at: current.created_at,
            previous,
            current,
        }
    }

    /// Signed change in quantity (previous treated as 0 when absent).
    pub fn delta(&self) -> i64 {
        self.current.quantity - self.previous.as_ref().map(|e| e.quantity).unwrap_or(0)
    }
}

impl Event for InventoryUpdated {
    fn event_type(&self) -> &'static str {
        "inventory.updated"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use stockledger_core::EntryId;

    use super::*;
    use crate::entry::NewLedgerEntry;

    fn entry(id: u64, quantity: i64) -> LedgerEntry {
        NewLedgerEntry::new(OwnerRef::new("product", "1"), quantity, None)
            .unwrap()
            .into_entry(EntryId::new(id), Utc::now())
    }

    #[test]
    fn delta_against_missing_previous_is_full_quantity() {
        let ev = InventoryUpdated::new(OwnerRef::new("product", "1"), None, entry(1, 4));
        assert_eq!(ev.delta(), 4);
        assert_eq!(ev.event_type(), "inventory.updated");
    }

    #[test]
    fn delta_against_previous_entry() {
        let ev = InventoryUpdated::new(
            OwnerRef::new("product", "1"),
            Some(entry(1, 4)),
            entry(2, 1),
        );
        assert_eq!(ev.delta(), -3);
        assert_eq!(Event::occurred_at(&ev), ev.current.created_at);
    }
}
