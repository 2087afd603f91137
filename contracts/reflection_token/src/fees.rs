//! Transfer classification and fee splitting.
//!
//! ```text
//! sender is pool     → BUY       (buy_fee %)
//! recipient is pool  → SELL      (sell_fee %)
//! otherwise          → TRANSFER  (transfer_fee %)
//!
//! fee       = amount × rate / 100
//! rewards   = fee × rewards_percentage / 100
//! marketing = fee − rewards          (division dust lands here)
//! net       = amount − fee
//! ```

use crate::constants::*;
use crate::errors::{Error, Result};
use crate::math::mul_div;

/// Direction of a transfer relative to the liquidity pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Buy,
    Sell,
    Transfer,
}

impl TransferKind {
    /// A pool sender wins over a pool recipient (pool → pool is a buy).
    pub fn classify(sender_is_pool: bool, recipient_is_pool: bool) -> Self {
        if sender_is_pool {
            TransferKind::Buy
        } else if recipient_is_pool {
            TransferKind::Sell
        } else {
            TransferKind::Transfer
        }
    }
}

/// Owner-configured fee rates, all in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct FeeRates {
    pub buy: u8,
    pub sell: u8,
    pub transfer: u8,
    /// Portion of each fee sent to the rewards pool.
    pub rewards_percentage: u8,
}

impl Default for FeeRates {
    fn default() -> Self {
        Self {
            buy: DEFAULT_BUY_FEE,
            sell: DEFAULT_SELL_FEE,
            transfer: DEFAULT_TRANSFER_FEE,
            rewards_percentage: DEFAULT_REWARDS_PERCENTAGE,
        }
    }
}

impl FeeRates {
    /// Converts a basis-point setter argument to the stored whole percent.
    pub fn percent_from_bps(bps: u16) -> Result<u8> {
        if u128::from(bps) > BPS_DENOMINATOR {
            return Err(Error::ValueOutOfRange);
        }
        Ok((bps / 100) as u8)
    }

    pub fn rate_for(&self, kind: TransferKind) -> u8 {
        match kind {
            TransferKind::Buy => self.buy,
            TransferKind::Sell => self.sell,
            TransferKind::Transfer => self.transfer,
        }
    }
}

/// Result of splitting one transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeSplit {
    pub fee: u128,
    pub marketing: u128,
    pub rewards: u128,
}

impl FeeSplit {
    pub const NONE: FeeSplit = FeeSplit {
        fee: 0,
        marketing: 0,
        rewards: 0,
    };

    /// Amount credited to the recipient.
    pub fn net(&self, amount: u128) -> u128 {
        amount.saturating_sub(self.fee)
    }
}

/// Computes the fee legs for a transfer of `amount`.
///
/// Exempt transfers (either party exempt) pay nothing; otherwise the rate
/// is picked by [`TransferKind::classify`]. A rate or rewards percentage
/// above 100 fails with `ValueOutOfRange`.
pub fn split(
    amount: u128,
    sender_is_pool: bool,
    recipient_is_pool: bool,
    exempt: bool,
    rates: &FeeRates,
) -> Result<FeeSplit> {
    if exempt {
        return Ok(FeeSplit::NONE);
    }

    let kind = TransferKind::classify(sender_is_pool, recipient_is_pool);
    let rate = u128::from(rates.rate_for(kind));
    let rewards_percentage = u128::from(rates.rewards_percentage);
    if rate > PERCENT_DENOMINATOR || rewards_percentage > PERCENT_DENOMINATOR {
        return Err(Error::ValueOutOfRange);
    }
    let fee = mul_div(amount, rate, PERCENT_DENOMINATOR)?;
    if fee == 0 {
        return Ok(FeeSplit::NONE);
    }

    let rewards = mul_div(fee, rewards_percentage, PERCENT_DENOMINATOR)?;
    Ok(FeeSplit {
        fee,
        marketing: fee - rewards,
        rewards,
    })
}
