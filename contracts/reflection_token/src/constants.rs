//! Fixed-point constants and deploy-time defaults.
//!
//! Fee rates are stored as whole percent (0–100). The owner setters accept
//! basis points and divide by 100 before storing, so `set_rates(500, ..)`
//! stores a 5% buy fee.

use ink::primitives::AccountId;

/// Denominator for all basis-point inputs (transaction and wallet caps,
/// setter arguments).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Denominator for stored whole-percent rates.
pub const PERCENT_DENOMINATOR: u128 = 100;

/// Fixed-point scale used when computing a holder's share of the
/// eligible supply.
pub const SCALE: u128 = 1_000_000_000_000_000_000;

// ── Default fee configuration (whole percent) ───────────────────────────────

pub const DEFAULT_BUY_FEE: u8 = 5;
pub const DEFAULT_SELL_FEE: u8 = 7;
pub const DEFAULT_TRANSFER_FEE: u8 = 2;

/// Share of every collected fee routed to the rewards pool; the remainder
/// goes to the marketing wallet.
pub const DEFAULT_REWARDS_PERCENTAGE: u8 = 70;

// ── Default limits (basis points of total supply) ───────────────────────────

/// 1% of supply per pool-facing transaction.
pub const DEFAULT_MAX_TRANSACTION_BPS: u16 = 100;

/// 2% of supply per non-pool wallet.
pub const DEFAULT_MAX_WALLET_BPS: u16 = 200;

/// Holders below this balance are not paid rewards.
pub const DEFAULT_MIN_HOLDING_FOR_REWARDS: u128 = 0;

/// The all-zero account, never a valid target for admin calls or transfers.
pub const ZERO_ADDRESS: [u8; 32] = [0u8; 32];

pub fn is_zero_address(account: &AccountId) -> bool {
    *account == AccountId::from(ZERO_ADDRESS)
}
