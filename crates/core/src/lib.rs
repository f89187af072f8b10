//! `stockledger-core`: ledger foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod owner;
pub mod value_object;

pub use error::{LedgerError, LedgerResult};
pub use id::EntryId;
pub use owner::{HasOwnerRef, OwnerRef, OwnerTypeRegistry};
pub use value_object::ValueObject;
