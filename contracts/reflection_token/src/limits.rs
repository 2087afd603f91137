//! Anti-whale caps, both expressed in basis points of total supply.

use crate::constants::BPS_DENOMINATOR;
use crate::errors::{Error, Result};
use crate::math::mul_div;

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct Limits {
    /// Largest amount a single pool-facing transfer may move.
    pub max_transaction_bps: u16,
    /// Largest balance a non-pool recipient may end up with.
    pub max_wallet_bps: u16,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_transaction_bps: crate::constants::DEFAULT_MAX_TRANSACTION_BPS,
            max_wallet_bps: crate::constants::DEFAULT_MAX_WALLET_BPS,
        }
    }
}

impl Limits {
    pub fn validate_bps(bps: u16) -> Result<u16> {
        if u128::from(bps) > BPS_DENOMINATOR {
            return Err(Error::ValueOutOfRange);
        }
        Ok(bps)
    }

    pub fn max_transaction_amount(&self, total_supply: u128) -> Result<u128> {
        mul_div(total_supply, u128::from(self.max_transaction_bps), BPS_DENOMINATOR)
    }

    pub fn max_wallet_amount(&self, total_supply: u128) -> Result<u128> {
        mul_div(total_supply, u128::from(self.max_wallet_bps), BPS_DENOMINATOR)
    }

    /// Gates the raw amount of any transfer touching a pool. Runs before
    /// the fee is known.
    pub fn check_transaction(&self, amount: u128, involves_pool: bool, total_supply: u128) -> Result<()> {
        if involves_pool && amount > self.max_transaction_amount(total_supply)? {
            return Err(Error::LimitExceeded);
        }
        Ok(())
    }

    /// Gates the recipient's post-transfer balance. Only called for
    /// fee-liable transfers into non-pool accounts, after the fee split.
    pub fn check_wallet(&self, recipient_balance: u128, net_amount: u128, total_supply: u128) -> Result<()> {
        let resulting = recipient_balance
            .checked_add(net_amount)
            .ok_or(Error::Overflow)?;
        if resulting > self.max_wallet_amount(total_supply)? {
            return Err(Error::LimitExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPLY: u128 = 100_000_000;

    fn limits(max_transaction_bps: u16, max_wallet_bps: u16) -> Limits {
        Limits {
            max_transaction_bps,
            max_wallet_bps,
        }
    }

    #[test]
    fn transaction_cap_applies_only_to_pool_transfers() {
        let l = limits(100, 200);
        assert_eq!(l.max_transaction_amount(SUPPLY), Ok(1_000_000));
        assert_eq!(l.check_transaction(1_000_000, true, SUPPLY), Ok(()));
        assert_eq!(l.check_transaction(1_000_001, true, SUPPLY), Err(Error::LimitExceeded));
        assert_eq!(l.check_transaction(50_000_000, false, SUPPLY), Ok(()));
    }

    #[test]
    fn wallet_cap_counts_existing_balance() {
        let l = limits(100, 200);
        assert_eq!(l.max_wallet_amount(SUPPLY), Ok(2_000_000));
        assert_eq!(l.check_wallet(1_500_000, 500_000, SUPPLY), Ok(()));
        assert_eq!(l.check_wallet(1_500_000, 500_001, SUPPLY), Err(Error::LimitExceeded));
    }

    #[test]
    fn zero_bps_blocks_every_pool_transfer() {
        let l = limits(0, 10_000);
        assert_eq!(l.check_transaction(1, true, SUPPLY), Err(Error::LimitExceeded));
        assert_eq!(l.check_transaction(0, true, SUPPLY), Ok(()));
    }

    #[test]
    fn bps_bound_is_inclusive() {
        assert_eq!(Limits::validate_bps(10_000), Ok(10_000));
        assert_eq!(Limits::validate_bps(10_001), Err(Error::ValueOutOfRange));
    }
}
