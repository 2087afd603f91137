//! Registry of accounts holding a nonzero balance.
//!
//! `holders` maps a 0-based position to its account and `count` is the
//! length of that dense sequence; `slots` maps an account back to its
//! 1-based position (a missing entry means "absent"). Every operation
//! touches a constant number of storage cells, so the root cell stays the
//! same size however many holders there are. Removal swaps the last holder
//! into the freed position, so enumeration order is not stable across
//! removals.

use ink::primitives::AccountId;
use ink::storage::Mapping;

use crate::errors::{Error, Result};

#[ink::storage_item]
#[derive(Debug, Default)]
pub struct HolderRegistry {
    holders: Mapping<u32, AccountId>,
    slots: Mapping<AccountId, u32>,
    count: u32,
}

impl HolderRegistry {
    pub fn contains(&self, account: &AccountId) -> bool {
        self.slots.contains(account)
    }

    /// Registers `account` unless it is already tracked or `balance` is
    /// zero. Returns whether the registry changed.
    pub fn add(&mut self, account: AccountId, balance: u128) -> bool {
        if balance == 0 || self.contains(&account) {
            return false;
        }
        self.holders.insert(self.count, &account);
        self.count += 1;
        self.slots.insert(account, &self.count);
        true
    }

    /// Drops `account` once its `balance` has reached zero. Returns whether
    /// the registry changed.
    pub fn remove(&mut self, account: AccountId, balance: u128) -> bool {
        if balance != 0 {
            return false;
        }
        let Some(slot) = self.slots.get(account) else {
            return false;
        };

        let last = self.count - 1;
        let position = slot - 1;
        if position != last {
            if let Some(moved) = self.holders.get(last) {
                self.holders.insert(position, &moved);
                self.slots.insert(moved, &slot);
            }
        }
        self.holders.remove(last);
        self.slots.remove(account);
        self.count = last;
        true
    }

    /// Adds or removes `account` so membership matches `balance`.
    pub fn sync(&mut self, account: AccountId, balance: u128) {
        if balance == 0 {
            self.remove(account, balance);
        } else {
            self.add(account, balance);
        }
    }

    pub fn at(&self, index: u32) -> Result<AccountId> {
        if index >= self.count {
            return Err(Error::IndexOutOfBounds);
        }
        self.holders.get(index).ok_or(Error::IndexOutOfBounds)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Holders in registry order.
    pub fn iter(&self) -> impl Iterator<Item = AccountId> + Clone + '_ {
        (0..self.count).filter_map(move |index| self.holders.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ink::prelude::vec::Vec;

    fn account(n: u8) -> AccountId {
        AccountId::from([n; 32])
    }

    fn listed(registry: &HolderRegistry) -> Vec<AccountId> {
        registry.iter().collect()
    }

    /// Every tracked account's slot points back at itself.
    fn assert_slots_consistent(registry: &HolderRegistry) {
        for (position, holder) in registry.iter().enumerate() {
            assert_eq!(registry.slots.get(holder), Some(position as u32 + 1));
        }
        assert_eq!(registry.iter().count() as u32, registry.count());
    }

    #[ink::test]
    fn add_appends_in_insertion_order() {
        let mut registry = HolderRegistry::default();
        assert!(registry.add(account(1), 10));
        assert!(registry.add(account(2), 20));
        assert!(registry.add(account(3), 30));

        assert_eq!(registry.count(), 3);
        assert_eq!(registry.at(0), Ok(account(1)));
        assert_eq!(registry.at(2), Ok(account(3)));
        assert_slots_consistent(&registry);
    }

    #[ink::test]
    fn add_ignores_duplicates_and_zero_balances() {
        let mut registry = HolderRegistry::default();
        assert!(registry.add(account(1), 10));
        assert!(!registry.add(account(1), 99));
        assert!(!registry.add(account(2), 0));

        assert_eq!(registry.count(), 1);
        assert!(!registry.contains(&account(2)));
    }

    #[ink::test]
    fn remove_swaps_last_holder_into_gap() {
        let mut registry = HolderRegistry::default();
        for n in 1..=4 {
            registry.add(account(n), 1);
        }

        assert!(registry.remove(account(2), 0));

        assert_eq!(registry.count(), 3);
        assert_eq!(listed(&registry), vec![account(1), account(4), account(3)]);
        assert!(!registry.contains(&account(2)));
        assert_slots_consistent(&registry);
    }

    #[ink::test]
    fn remove_last_and_only_holder() {
        let mut registry = HolderRegistry::default();
        registry.add(account(1), 5);
        registry.add(account(2), 5);

        assert!(registry.remove(account(2), 0));
        assert_eq!(listed(&registry), vec![account(1)]);
        assert!(registry.remove(account(1), 0));
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.at(0), Err(Error::IndexOutOfBounds));
        assert_slots_consistent(&registry);
    }

    #[ink::test]
    fn remove_is_noop_for_funded_or_unknown_accounts() {
        let mut registry = HolderRegistry::default();
        registry.add(account(1), 5);

        assert!(!registry.remove(account(1), 5));
        assert!(!registry.remove(account(9), 0));
        assert_eq!(registry.count(), 1);
    }

    #[ink::test]
    fn removed_account_can_rejoin() {
        let mut registry = HolderRegistry::default();
        registry.add(account(1), 5);
        registry.add(account(2), 5);
        registry.remove(account(1), 0);

        assert!(registry.add(account(1), 3));
        assert_eq!(listed(&registry), vec![account(2), account(1)]);
        assert_slots_consistent(&registry);
    }

    #[ink::test]
    fn churn_keeps_sequence_dense() {
        let mut registry = HolderRegistry::default();
        for n in 1..=90 {
            registry.add(account(n), 1);
        }
        for n in (3..=90).step_by(3) {
            assert!(registry.remove(account(n), 0));
        }
        for n in 200..=209 {
            registry.add(account(n), 1);
        }

        // 90 added, 30 removed, 10 re-added
        assert_eq!(registry.count(), 70);
        let holders = listed(&registry);
        for n in (1..=90).chain(200..=209) {
            assert_eq!(holders.contains(&account(n)), n > 90 || n % 3 != 0);
        }
        assert_slots_consistent(&registry);
    }

    #[ink::test]
    fn sync_follows_balance() {
        let mut registry = HolderRegistry::default();
        registry.sync(account(1), 7);
        assert!(registry.contains(&account(1)));
        registry.sync(account(1), 0);
        assert!(!registry.contains(&account(1)));
    }

    #[ink::test]
    fn at_past_end_is_out_of_bounds() {
        let mut registry = HolderRegistry::default();
        registry.add(account(1), 1);
        assert_eq!(registry.at(1), Err(Error::IndexOutOfBounds));
    }
}
