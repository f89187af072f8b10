//! Owners: the application entities a ledger is attached to.
//!
//! An owner is identified by a type tag plus an id. Application types opt in by
//! implementing [`HasOwnerRef`]; an [`OwnerTypeRegistry`] maps those types to the
//! stable tags written into the ledger.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Reference to one owning entity: `(owner_type, owner_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerRef {
    owner_type: String,
    owner_id: String,
}

impl OwnerRef {
    pub fn new(owner_type: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            owner_type: owner_type.into(),
            owner_id: owner_id.into(),
        }
    }

    pub fn owner_type(&self) -> &str {
        &self.owner_type
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl ValueObject for OwnerRef {}

impl core::fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}#{}", self.owner_type, self.owner_id)
    }
}

/// Capability of an application entity to carry an inventory ledger.
pub trait HasOwnerRef {
    /// Type tag used when the registry has no alias for this type.
    const OWNER_TYPE: &'static str;

    /// Key of this instance, written as the ledger's owner id.
    fn owner_key(&self) -> String;
}

/// Maps owner types to the tags stored in the ledger.
///
/// Registering an alias decouples stored rows from the type's declared name, so
/// a type can be renamed without rewriting history.
#[derive(Debug, Clone, Default)]
pub struct OwnerTypeRegistry {
    aliases: HashMap<&'static str, String>,
}

impl OwnerTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the tag stored for `T`.
    pub fn register<T: HasOwnerRef>(&mut self, tag: impl Into<String>) -> &mut Self {
        self.aliases.insert(T::OWNER_TYPE, tag.into());
        self
    }

    /// Tag for `T`: its alias if registered, otherwise `T::OWNER_TYPE`.
    pub fn tag_for<T: HasOwnerRef>(&self) -> &str {
        self.aliases
            .get(T::OWNER_TYPE)
            .map(String::as_str)
            .unwrap_or(T::OWNER_TYPE)
    }

    pub fn owner_ref<T: HasOwnerRef>(&self, entity: &T) -> OwnerRef {
        OwnerRef::new(self.tag_for::<T>(), entity.owner_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Product {
        sku: &'static str,
    }

    impl HasOwnerRef for Product {
        const OWNER_TYPE: &'static str = "app.product";

        fn owner_key(&self) -> String {
            self.sku.to_string()
        }
    }

    #[test]
    fn unregistered_type_uses_declared_tag() {
        let registry = OwnerTypeRegistry::new();
        let owner = registry.owner_ref(&Product { sku: "A-1" });
        assert_eq!(owner, OwnerRef::new("app.product", "A-1"));
    }

    #[test]
    fn registered_alias_wins() {
        let mut registry = OwnerTypeRegistry::new();
        registry.register::<Product>("product");
        let owner = registry.owner_ref(&Product { sku: "A-1" });
        assert_eq!(owner.owner_type(), "product");
        assert_eq!(owner.to_string(), "product#A-1");
    }
}
