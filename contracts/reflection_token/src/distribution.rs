//! Proportional reward distribution over the holder registry.
//!
//! ```text
//! eligible(h)    = !excluded(h) && balance(h) ≥ min_holding
//! eligible_total = total_supply − Σ balance(h) for every ineligible holder
//! share(h)       = balance(h) × SCALE / eligible_total
//! payout(h)      = pool × share(h) / SCALE
//! ```
//!
//! Both divisions truncate; the dust stays in the pool. Holders are paid in
//! registry order and a failed payout is skipped, never retried.

use crate::constants::SCALE;
use crate::errors::{Error, Result};
use crate::math::mul_div;

/// Outcome of one distribution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Distribution {
    /// Sum of payouts the value transfer accepted.
    pub delivered: u128,
    pub paid: u32,
    /// Eligible holders whose payout transfer failed.
    pub skipped: u32,
}

/// Read-only view over the holder set for one pass.
///
/// `holders` is walked twice (once for the eligible total, once to pay), so
/// it has to be a cloneable iterator.
pub struct RewardPass<A, I, B, X>
where
    I: Iterator<Item = A> + Clone,
    B: Fn(&A) -> u128,
    X: Fn(&A) -> bool,
{
    pub holders: I,
    pub total_supply: u128,
    pub min_holding: u128,
    pub balance_of: B,
    pub is_excluded: X,
}

impl<A, I, B, X> RewardPass<A, I, B, X>
where
    I: Iterator<Item = A> + Clone,
    B: Fn(&A) -> u128,
    X: Fn(&A) -> bool,
{
    fn is_eligible(&self, holder: &A, balance: u128) -> bool {
        !(self.is_excluded)(holder) && balance >= self.min_holding
    }

    pub fn eligible_total(&self) -> u128 {
        let ineligible: u128 = self
            .holders
            .clone()
            .map(|holder| {
                let balance = (self.balance_of)(&holder);
                (holder, balance)
            })
            .filter(|(holder, balance)| !self.is_eligible(holder, *balance))
            .fold(0u128, |sum, (_, balance)| sum.saturating_add(balance));
        self.total_supply.saturating_sub(ineligible)
    }

    /// Pays `pool` out to every eligible holder through `pay`.
    ///
    /// `pay` failing for a holder only skips that holder.
    pub fn run<P, E>(&self, pool: u128, mut pay: P) -> Result<Distribution>
    where
        P: FnMut(A, u128) -> core::result::Result<(), E>,
    {
        if pool == 0 {
            return Err(Error::NoFundsAvailable);
        }
        let eligible_total = self.eligible_total();
        if eligible_total == 0 {
            return Err(Error::NoEligibleHolders);
        }

        let mut outcome = Distribution::default();
        for holder in self.holders.clone() {
            let balance = (self.balance_of)(&holder);
            if !self.is_eligible(&holder, balance) {
                continue;
            }

            let share = mul_div(balance, SCALE, eligible_total)?;
            let payout = mul_div(pool, share, SCALE)?;
            if payout == 0 {
                continue;
            }

            match pay(holder, payout) {
                Ok(()) => {
                    outcome.delivered = outcome.delivered.saturating_add(payout);
                    outcome.paid += 1;
                }
                Err(_) => outcome.skipped += 1,
            }
        }
        Ok(outcome)
    }
}
