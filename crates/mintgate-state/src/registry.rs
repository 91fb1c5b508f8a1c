//! # Token Registry Seam
//!
//! Ownership records live outside the engine. The engine needs only three
//! things from them: mint the next sequential id to an account, count an
//! account's items, and enumerate them.

use std::collections::BTreeMap;

use mintgate_core::{AccountId, Count, ItemId};

/// External ownership records.
pub trait TokenRegistry {
    /// Assign the next sequential id to `recipient`. Ids start at 1 and are
    /// never reused.
    fn mint_next(&mut self, recipient: AccountId) -> ItemId;

    /// Number of items held by `account`.
    fn count_owned_by(&self, account: &AccountId) -> Count;

    /// Ids held by `account`, ascending.
    fn ids_owned_by(&self, account: &AccountId) -> Vec<ItemId>;

    /// Holder of `id`, if it was ever minted.
    fn owner_of(&self, id: ItemId) -> Option<AccountId>;
}

/// `BTreeMap`-backed registry. Ids are contiguous from 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryRegistry {
    owners: BTreeMap<ItemId, AccountId>,
}

impl InMemoryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted ownership map.
    pub fn from_owners(owners: BTreeMap<ItemId, AccountId>) -> Self {
        Self { owners }
    }

    /// The full ownership map.
    pub fn owners(&self) -> &BTreeMap<ItemId, AccountId> {
        &self.owners
    }

    /// Whether the map holds exactly the ids `1..=issued`.
    pub fn is_contiguous_to(&self, issued: Count) -> bool {
        self.owners.len() as u64 == issued
            && self
                .owners
                .keys()
                .zip(1..)
                .all(|(id, expected)| id.get() == expected)
    }
}

impl TokenRegistry for InMemoryRegistry {
    fn mint_next(&mut self, recipient: AccountId) -> ItemId {
        let id = ItemId(self.owners.len() as u64 + 1);
        self.owners.insert(id, recipient);
        id
    }

    fn count_owned_by(&self, account: &AccountId) -> Count {
        self.owners.values().filter(|owner| *owner == account).count() as Count
    }

    fn ids_owned_by(&self, account: &AccountId) -> Vec<ItemId> {
        self.owners
            .iter()
            .filter(|(_, owner)| *owner == account)
            .map(|(id, _)| *id)
            .collect()
    }

    fn owner_of(&self, id: ItemId) -> Option<AccountId> {
        self.owners.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_and_enumeration() {
        let a = AccountId::new([1; 20]);
        let b = AccountId::new([2; 20]);
        let mut reg = InMemoryRegistry::new();
        assert_eq!(reg.mint_next(a), ItemId(1));
        assert_eq!(reg.mint_next(b), ItemId(2));
        assert_eq!(reg.mint_next(a), ItemId(3));
        assert_eq!(reg.ids_owned_by(&a), vec![ItemId(1), ItemId(3)]);
        assert_eq!(reg.count_owned_by(&b), 1);
        assert_eq!(reg.owner_of(ItemId(2)), Some(b));
        assert_eq!(reg.owner_of(ItemId(4)), None);
        assert!(reg.is_contiguous_to(3));
        assert!(!reg.is_contiguous_to(2));
    }

    #[test]
    fn test_gap_is_not_contiguous() {
        let a = AccountId::new([1; 20]);
        let mut owners = BTreeMap::new();
        owners.insert(ItemId(1), a);
        owners.insert(ItemId(3), a);
        assert!(!InMemoryRegistry::from_owners(owners).is_contiguous_to(2));
    }
}
