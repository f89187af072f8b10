use serde::{Deserialize, Serialize};

use stockledger_core::{LedgerError, LedgerResult};

use crate::entry::LedgerEntry;
use crate::level::StockLevel;

/// A quantity change requested for one owner.
///
/// Decisions are pure: given the owner's current entry, [`LedgerCommand::decide`]
/// returns the quantity of the next entry or rejects the change. Reading the
/// current entry and writing the result is the engine's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    /// Replace the quantity, ignoring history.
    Set {
        quantity: i64,
        description: Option<String>,
    },
    /// Add to the current quantity (0 when there is no history).
    Add {
        delta: i64,
        description: Option<String>,
    },
    /// Subtract `|delta|` from the current quantity.
    ///
    /// The sign of `delta` is ignored: subtracting `-4` removes 4 units.
    Subtract {
        delta: i64,
        description: Option<String>,
    },
}

impl LedgerCommand {
    pub fn set(quantity: i64, description: Option<String>) -> Self {
        Self::Set {
            quantity,
            description,
        }
    }

    pub fn add(delta: i64, description: Option<String>) -> Self {
        Self::Add { delta, description }
    }

    pub fn subtract(delta: i64, description: Option<String>) -> Self {
        Self::Subtract { delta, description }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LedgerCommand::Set { .. } => "set",
            LedgerCommand::Add { .. } => "add",
            LedgerCommand::Subtract { .. } => "subtract",
        }
    }

    pub fn into_description(self) -> Option<String> {
        match self {
            LedgerCommand::Set { description, .. }
            | LedgerCommand::Add { description, .. }
            | LedgerCommand::Subtract { description, .. } => description,
        }
    }

    /// Argument checks that need no ledger state.
    ///
    /// Run before touching the store so a rejected call never reads or writes.
    pub fn validate(&self) -> LedgerResult<()> {
        match self {
            LedgerCommand::Set { quantity, .. } => ensure_non_negative(*quantity),
            LedgerCommand::Add { delta, .. } => ensure_non_negative(*delta),
            LedgerCommand::Subtract { delta, .. } => magnitude(*delta).map(|_| ()),
        }
    }

    /// Quantity of the entry this command would create on top of `current`.
    pub fn decide(&self, current: Option<&LedgerEntry>) -> LedgerResult<i64> {
        self.validate()?;

        match self {
            LedgerCommand::Set { quantity, .. } => Ok(*quantity),
            LedgerCommand::Add { delta, .. } => {
                let base = current.map(|e| e.quantity).unwrap_or(0);
                base.checked_add(*delta).ok_or(LedgerError::QuantityOverflow)
            }
            LedgerCommand::Subtract { delta, .. } => {
                let delta = magnitude(*delta)?;
                let level = StockLevel::of(current);
                let current = match level {
                    StockLevel::Stocked(q) => q,
                    StockLevel::NoHistory | StockLevel::Depleted(_) => {
                        return Err(LedgerError::Depleted { delta });
                    }
                };

                let next = current - delta;
                if next < 0 {
                    return Err(LedgerError::NegativeResult { current, delta });
                }
                Ok(next)
            }
        }
    }
}

fn ensure_non_negative(quantity: i64) -> LedgerResult<()> {
    if quantity < 0 {
        return Err(LedgerError::invalid_quantity(quantity));
    }
    Ok(())
}

/// `|delta|`, rejecting `i64::MIN` which has no positive counterpart.
fn magnitude(delta: i64) -> LedgerResult<i64> {
    delta
        .checked_abs()
        .ok_or(LedgerError::invalid_quantity(delta))
}
