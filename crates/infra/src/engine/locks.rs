//! Per-owner serialization within one process.
//!
//! The ledger's read-current/write-next sequence is not atomic against the store.
//! When enabled, the engine runs each sequence under the owner's mutex so two
//! callers mutating the same owner cannot both read the same current entry.
//! Other processes writing to the same store are not covered.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use stockledger_core::OwnerRef;

#[derive(Debug, Default)]
pub struct OwnerLocks {
    slots: Mutex<HashMap<OwnerRef, Arc<Mutex<()>>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding `owner`'s lock.
    ///
    /// Not reentrant: `f` must not call back into `run` for the same owner.
    pub fn run<R>(&self, owner: &OwnerRef, f: impl FnOnce() -> R) -> R {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry(owner.clone()).or_default().clone()
        };

        let result = {
            // A panic in a previous holder leaves no state behind the mutex.
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        // Slots are cloned only under the map lock, so a count of 2 (map + us)
        // means nobody else is waiting on this owner.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&slot) == 2 {
            slots.remove(owner);
        }

        result
    }

    /// Owners with a live slot (held or awaited).
    pub fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
