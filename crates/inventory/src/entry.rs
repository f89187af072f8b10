use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{EntryId, LedgerError, LedgerResult, OwnerRef};

/// Name of the built-in entry model, as referenced from configuration.
pub const LEDGER_ENTRY_MODEL: &str = "stockledger.ledger_entry";

/// Entry models with the ledger entry shape (id, owner, quantity, description,
/// created_at). Configuration naming anything else is rejected at wiring time.
const CONFORMING_MODELS: &[&str] = &[LEDGER_ENTRY_MODEL];

/// Reject entry models that do not have the ledger entry shape.
pub fn ensure_entry_model(model: &str) -> LedgerResult<()> {
    if CONFORMING_MODELS.contains(&model) {
        Ok(())
    } else {
        Err(LedgerError::invalid_model(model))
    }
}

/// One immutable historical record of an owner's quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    #[serde(flatten)]
    pub owner: OwnerRef,
    pub quantity: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn owner_type(&self) -> &str {
        self.owner.owner_type()
    }

    pub fn owner_id(&self) -> &str {
        self.owner.owner_id()
    }

    /// Whether this entry is more recent than `other` (larger id).
    pub fn supersedes(&self, other: &LedgerEntry) -> bool {
        self.id > other.id
    }
}

impl core::fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} @{}: {}", self.owner, self.id, self.quantity)
    }
}

/// An entry ready to be written (store assigns `id` and `created_at`).
///
/// Construction enforces the non-negative quantity invariant, so a store never
/// sees a negative row from this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    owner: OwnerRef,
    quantity: i64,
    description: Option<String>,
}

impl NewLedgerEntry {
    pub fn new(owner: OwnerRef, quantity: i64, description: Option<String>) -> LedgerResult<Self> {
        if quantity < 0 {
            return Err(LedgerError::invalid_quantity(quantity));
        }
        Ok(Self {
            owner,
            quantity,
            description,
        })
    }

    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Materialize with store-assigned fields.
    pub fn into_entry(self, id: EntryId, created_at: DateTime<Utc>) -> LedgerEntry {
        LedgerEntry {
            id,
            owner: self.owner,
            quantity: self.quantity,
            description: self.description,
            created_at,
        }
    }
}
