//! Contract error type shared by the policy modules and the contract.

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    /// Caller is not the contract owner.
    NotOwner,
    /// The zero address (or the contract itself, where forbidden) was passed
    /// where a real account is required.
    InvalidAddress,
    /// `holder_at` was queried past the end of the registry.
    IndexOutOfBounds,
    /// Distribution was triggered with an empty native-value pool.
    NoFundsAvailable,
    /// Distribution was triggered while no holder qualifies for rewards.
    NoEligibleHolders,
    /// Transaction-size or wallet-cap violation.
    LimitExceeded,
    /// A ledger move exceeds the available balance.
    InsufficientBalance,
    /// Spender's allowance is insufficient.
    InsufficientAllowance,
    /// A native value transfer or foreign token call failed.
    TransferFailed,
    /// An owner setter received an argument above its bound.
    ValueOutOfRange,
    /// `distribute_rewards` was entered while a distribution is running.
    DistributionInProgress,
    /// An arithmetic operation overflowed.
    Overflow,
}

pub type Result<T> = core::result::Result<T, Error>;
