//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Deterministic validation and state failures only. None of these are retriable:
/// the same call against the same ledger state fails the same way. Store and
/// transport failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A quantity argument was negative (or has no absolute value).
    #[error("{0} is an invalid quantity for an inventory")]
    InvalidQuantity(i64),

    /// Subtraction requested on an owner without stock.
    #[error("inventory is depleted, unable to subtract {delta}")]
    Depleted { delta: i64 },

    /// Subtraction would leave a negative quantity.
    #[error("inventory quantity {current} is less than {delta}, result would be negative")]
    NegativeResult { current: i64, delta: i64 },

    /// The configured entry model does not have the ledger entry shape.
    #[error("invalid ledger model `{0}`: not a conforming ledger entry model")]
    InvalidLedgerModel(String),

    /// A comparison operator outside `=`, `<`, `>`, `<=`, `>=`, `<>`.
    #[error("invalid comparison operator `{0}`")]
    InvalidOperator(String),

    /// Addition overflowed the quantity range.
    #[error("quantity overflow")]
    QuantityOverflow,
}

impl LedgerError {
    pub fn invalid_quantity(quantity: i64) -> Self {
        Self::InvalidQuantity(quantity)
    }

    pub fn invalid_model(model: impl Into<String>) -> Self {
        Self::InvalidLedgerModel(model.into())
    }

    pub fn invalid_operator(op: impl Into<String>) -> Self {
        Self::InvalidOperator(op.into())
    }
}
