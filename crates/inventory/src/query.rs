//! Quantity filters for "which owners currently hold N" lookups.
//!
//! Filters are evaluated against each owner's **current** entry only. Historical
//! rows never match on their own.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockledger_core::{LedgerError, ValueObject};

/// Comparison between an owner's current quantity and a reference quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Comparison {
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Eq,
        Comparison::Ne,
        Comparison::Lt,
        Comparison::Le,
        Comparison::Gt,
        Comparison::Ge,
    ];

    /// Operator as written in SQL.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    pub fn evaluate(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}

impl core::fmt::Display for Comparison {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Comparison {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" => Ok(Comparison::Eq),
            "<>" | "!=" => Ok(Comparison::Ne),
            "<" => Ok(Comparison::Lt),
            "<=" => Ok(Comparison::Le),
            ">" => Ok(Comparison::Gt),
            ">=" => Ok(Comparison::Ge),
            other => Err(LedgerError::invalid_operator(other)),
        }
    }
}

/// `current_quantity <comparison> quantity`.
///
/// Defaults to `= 0`, i.e. "owners currently out of stock".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QuantityFilter {
    pub comparison: Comparison,
    pub quantity: i64,
}

impl QuantityFilter {
    pub fn new(quantity: i64, comparison: Comparison) -> Self {
        Self {
            comparison,
            quantity,
        }
    }

    pub fn not_equal(quantity: i64) -> Self {
        Self::new(quantity, Comparison::Ne)
    }

    pub fn matches(&self, current_quantity: i64) -> bool {
        self.comparison.evaluate(current_quantity, self.quantity)
    }
}

impl ValueObject for QuantityFilter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_operator_back_from_sql() {
        for op in Comparison::ALL {
            assert_eq!(op.as_sql().parse::<Comparison>().unwrap(), op);
        }
        assert_eq!("!=".parse::<Comparison>().unwrap(), Comparison::Ne);
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = "like".parse::<Comparison>().unwrap_err();
        assert_eq!(err, LedgerError::InvalidOperator("like".into()));
    }

    #[test]
    fn filter_compares_current_against_reference() {
        assert!(QuantityFilter::new(9, Comparison::Gt).matches(10));
        assert!(QuantityFilter::new(9, Comparison::Ge).matches(10));
        assert!(!QuantityFilter::new(9, Comparison::Lt).matches(10));
        assert!(!QuantityFilter::new(9, Comparison::Le).matches(10));
        assert!(QuantityFilter::not_equal(1).matches(0));
    }

    #[test]
    fn default_filter_is_out_of_stock() {
        let filter = QuantityFilter::default();
        assert!(filter.matches(0));
        assert!(!filter.matches(1));
    }

    #[test]
    fn comparison_serializes_as_operator() {
        let json = serde_json::to_string(&Comparison::Le).unwrap();
        assert_eq!(json, "\"<=\"");
    }
}
