use serde::{Deserialize, Serialize};

use crate::entry::LedgerEntry;

/// Stock state of one owner, derived from its current entry.
///
/// ```text
/// NoHistory --set/add--> Stocked(q>0) | Depleted(0)
/// Stocked <--add/subtract/set--> Depleted
/// any --clear--> NoHistory
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
    NoHistory,
    Stocked(i64),
    Depleted(i64),
}

impl StockLevel {
    pub fn of(current: Option<&LedgerEntry>) -> Self {
        match current {
            None => StockLevel::NoHistory,
            Some(e) if e.quantity > 0 => StockLevel::Stocked(e.quantity),
            Some(e) => StockLevel::Depleted(e.quantity),
        }
    }

    pub fn quantity(&self) -> Option<i64> {
        match self {
            StockLevel::NoHistory => None,
            StockLevel::Stocked(q) | StockLevel::Depleted(q) => Some(*q),
        }
    }

    pub fn is_depleted(&self) -> bool {
        !matches!(self, StockLevel::Stocked(_))
    }

    /// True when a current entry exists and holds at least `min_quantity`.
    pub fn is_stocked(&self, min_quantity: i64) -> bool {
        self.quantity().is_some_and(|q| q >= min_quantity)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use stockledger_core::{EntryId, OwnerRef};

    use super::*;
    use crate::entry::NewLedgerEntry;

    fn entry(quantity: i64) -> LedgerEntry {
        NewLedgerEntry::new(OwnerRef::new("product", "1"), quantity, None)
            .unwrap()
            .into_entry(EntryId::new(1), Utc::now())
    }

    #[test]
    fn no_history_is_depleted_and_not_stocked() {
        let level = StockLevel::of(None);
        assert_eq!(level, StockLevel::NoHistory);
        assert!(level.is_depleted());
        assert!(!level.is_stocked(1));
        assert_eq!(level.quantity(), None);
    }

    #[test]
    fn zero_quantity_is_depleted() {
        let e = entry(0);
        let level = StockLevel::of(Some(&e));
        assert_eq!(level, StockLevel::Depleted(0));
        assert!(level.is_depleted());
        assert!(!level.is_stocked(1));
        assert!(level.is_stocked(0));
    }

    #[test]
    fn stocked_respects_minimum() {
        let e = entry(5);
        let level = StockLevel::of(Some(&e));
        assert!(!level.is_depleted());
        assert!(level.is_stocked(5));
        assert!(!level.is_stocked(6));
    }
}
