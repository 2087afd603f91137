#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub mod constants;
pub mod distribution;
pub mod errors;
pub mod fees;
pub mod holders;
pub mod limits;
pub mod math;

/// # Reflection Token: taxed ledger with proportional holder rewards
///
/// Every transfer is classified against the registered liquidity pools,
/// taxed, and the tax is split between the marketing wallet and the
/// contract's own balance (the rewards leg). Native value sent to the
/// contract is periodically paid out to qualifying holders in proportion
/// to their token balance.
///
/// ```text
/// TRANSFER PIPELINE (one atomic step):
///   1. pool involved?      amount ≤ supply × max_transaction_bps / 10 000
///   2. neither exempt?     fee split by kind (buy / sell / transfer)
///      recipient no pool?  balance(to) + credited ≤ supply × max_wallet_bps / 10 000
///                          (credited = net, plus any fee leg `to` itself receives)
///   3. from → marketing    marketing leg     (fee − rewards)
///      from → contract     rewards leg       (fee × rewards% / 100)
///      from → to           net               (amount − fee)
///   4. holder registry follows every touched balance
///
/// DISTRIBUTION (anyone may trigger, never reentrant):
///   pool     = native balance of the contract
///   eligible = not excluded AND balance ≥ min_holding_for_rewards
///   payout   = pool × (balance × 1e18 / eligible_total) / 1e18
///   a payout the chain refuses is skipped; the rest still get paid
/// ```
///
/// Rates are stored as whole percent; the owner setters take basis points
/// and divide by 100 (`set_rates(500, ..)` → 5%).
#[ink::contract]
mod reflection_token {
    use crate::constants::*;
    use crate::distribution::{Distribution, RewardPass};
    use crate::errors::Error;
    use crate::fees::{self, FeeRates, FeeSplit};
    use crate::holders::HolderRegistry;
    use crate::limits::Limits;
    use ink::env::call::{build_call, ExecutionInput, Selector};
    use ink::env::DefaultEnvironment;
    use ink::prelude::{string::String, vec::Vec};
    use ink::storage::{Lazy, Mapping};

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct ReflectionToken {
        // ── Ledger ────────────────────────────────────────────────────────
        total_supply: Balance,
        balances: Mapping<AccountId, Balance>,
        allowances: Mapping<(AccountId, AccountId), Balance>,

        // ── Access control ────────────────────────────────────────────────
        owner: AccountId,
        marketing_wallet: AccountId,

        // ── Policy ────────────────────────────────────────────────────────
        fee_rates: FeeRates,
        limits: Limits,
        min_holding_for_rewards: Balance,
        liquidity_pools: Mapping<AccountId, bool>,
        fee_exempt: Mapping<AccountId, bool>,
        reward_excluded: Mapping<AccountId, bool>,

        // ── Rewards ───────────────────────────────────────────────────────
        holders: HolderRegistry,
        /// Set for the duration of `distribute_rewards`. Kept in its own
        /// cell so the write lands before the first payout leaves.
        distributing: Lazy<bool>,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    #[ink(event)]
    pub struct Transfer {
        #[ink(topic)]
        from: Option<AccountId>,
        #[ink(topic)]
        to: Option<AccountId>,
        value: Balance,
    }

    #[ink(event)]
    pub struct Approval {
        #[ink(topic)]
        owner: AccountId,
        #[ink(topic)]
        spender: AccountId,
        value: Balance,
    }

    /// Stored whole-percent rates after a `set_rates` call.
    #[ink(event)]
    pub struct FeesUpdated {
        buy: u8,
        sell: u8,
        transfer: u8,
    }

    #[ink(event)]
    pub struct RewardsPercentageUpdated {
        percentage: u8,
    }

    #[ink(event)]
    pub struct MinHoldingUpdated {
        amount: Balance,
    }

    #[ink(event)]
    pub struct LimitsUpdated {
        max_transaction_bps: u16,
        max_wallet_bps: u16,
    }

    #[ink(event)]
    pub struct LiquidityPoolUpdated {
        #[ink(topic)]
        pool: AccountId,
        enabled: bool,
    }

    #[ink(event)]
    pub struct FeeExemptionUpdated {
        #[ink(topic)]
        account: AccountId,
        exempt: bool,
    }

    #[ink(event)]
    pub struct RewardExclusionUpdated {
        #[ink(topic)]
        account: AccountId,
        excluded: bool,
    }

    #[ink(event)]
    pub struct MarketingWalletUpdated {
        #[ink(topic)]
        wallet: AccountId,
    }

    #[ink(event)]
    pub struct OwnershipTransferred {
        #[ink(topic)]
        previous: AccountId,
        #[ink(topic)]
        new_owner: AccountId,
    }

    #[ink(event)]
    pub struct RewardsFunded {
        #[ink(topic)]
        from: AccountId,
        value: Balance,
    }

    /// Summary of one `distribute_rewards` pass.
    ///
    /// | Field       | Meaning                                        |
    /// |-------------|------------------------------------------------|
    /// | `pool`      | Native balance at the start of the pass        |
    /// | `delivered` | Sum of payouts that reached their holder       |
    /// | `paid`      | Holders paid                                   |
    /// | `skipped`   | Eligible holders whose payout transfer failed  |
    #[ink(event)]
    pub struct RewardsDistributed {
        pool: Balance,
        delivered: Balance,
        paid: u32,
        skipped: u32,
    }

    #[ink(event)]
    pub struct NativeWithdrawn {
        #[ink(topic)]
        to: AccountId,
        amount: Balance,
    }

    #[ink(event)]
    pub struct StuckTokensWithdrawn {
        #[ink(topic)]
        to: AccountId,
        amount: Balance,
    }

    #[ink(event)]
    pub struct ForeignTokenWithdrawn {
        #[ink(topic)]
        token: AccountId,
        #[ink(topic)]
        to: AccountId,
        amount: Balance,
    }

    /// Error type of the PSP22 standard, decoded from foreign token replies.
    #[derive(Debug, scale::Decode)]
    pub enum PSP22Error {
        Custom(String),
        InsufficientBalance,
        InsufficientAllowance,
        ZeroRecipientAddress,
        ZeroSenderAddress,
        SafeTransferCheckFailed(String),
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl ReflectionToken {
        /// Mints `initial_supply` to the deployer, who becomes owner.
        ///
        /// Deployer, contract and marketing wallet start fee-exempt; the
        /// contract and marketing wallet start excluded from rewards.
        #[ink(constructor)]
        pub fn new(initial_supply: Balance, marketing_wallet: AccountId) -> Self {
            let caller = Self::env().caller();
            let contract = Self::env().account_id();

            let mut balances = Mapping::default();
            balances.insert(caller, &initial_supply);

            let mut fee_exempt = Mapping::default();
            for account in [caller, contract, marketing_wallet] {
                fee_exempt.insert(account, &true);
            }

            let mut reward_excluded = Mapping::default();
            for account in [contract, marketing_wallet] {
                reward_excluded.insert(account, &true);
            }

            let mut token = Self {
                total_supply: initial_supply,
                balances,
                allowances: Mapping::default(),
                owner: caller,
                marketing_wallet,
                fee_rates: FeeRates::default(),
                limits: Limits::default(),
                min_holding_for_rewards: DEFAULT_MIN_HOLDING_FOR_REWARDS,
                liquidity_pools: Mapping::default(),
                fee_exempt,
                reward_excluded,
                holders: HolderRegistry::default(),
                distributing: Lazy::default(),
            };
            token.holders.add(caller, initial_supply);

            Self::env().emit_event(Transfer {
                from: None,
                to: Some(caller),
                value: initial_supply,
            });

            token
        }

        // =====================================================================
        // TOKEN SURFACE
        // =====================================================================

        #[ink(message)]
        pub fn total_supply(&self) -> Balance {
            self.total_supply
        }

        #[ink(message)]
        pub fn balance_of(&self, owner: AccountId) -> Balance {
            self.balances.get(owner).unwrap_or(0)
        }

        #[ink(message)]
        pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Balance {
            self.allowances.get((owner, spender)).unwrap_or(0)
        }

        #[ink(message)]
        pub fn approve(&mut self, spender: AccountId, value: Balance) -> Result<(), Error> {
            let owner = self.env().caller();
            self.allowances.insert((owner, spender), &value);
            self.env().emit_event(Approval { owner, spender, value });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, value: Balance) -> Result<(), Error> {
            let from = self.env().caller();
            self.process_transfer(from, to, value)
        }

        /// Allowance is consumed only when the transfer itself succeeds.
        #[ink(message)]
        pub fn transfer_from(
            &mut self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(), Error> {
            let caller = self.env().caller();
            let allowance = self.allowance(from, caller);
            if allowance < value {
                return Err(Error::InsufficientAllowance);
            }

            self.process_transfer(from, to, value)?;
            self.allowances.insert((from, caller), &(allowance - value));
            Ok(())
        }

        // =====================================================================
        // THE ORCHESTRATOR
        // =====================================================================

        /// Runs limits, fee split, and every ledger leg of one transfer.
        ///
        /// All checks complete before the first balance is written, so a
        /// rejected transfer leaves no trace.
        fn process_transfer(
            &mut self,
            from: AccountId,
            to: AccountId,
            value: Balance,
        ) -> Result<(), Error> {
            if is_zero_address(&to) {
                return Err(Error::InvalidAddress);
            }

            let from_pool = self.is_liquidity_pool(from);
            let to_pool = self.is_liquidity_pool(to);
            self.limits
                .check_transaction(value, from_pool || to_pool, self.total_supply)?;

            if self.balance_of(from) < value {
                return Err(Error::InsufficientBalance);
            }

            let exempt = self.is_fee_exempt(from) || self.is_fee_exempt(to);
            let split = fees::split(value, from_pool, to_pool, exempt, &self.fee_rates)?;
            let net = split.net(value);

            if !exempt && !to_pool {
                let credited = self.credited_to(to, net, &split)?;
                self.limits
                    .check_wallet(self.balance_of(to), credited, self.total_supply)?;
            }

            if split.marketing > 0 {
                self.move_balance(from, self.marketing_wallet, split.marketing)?;
            }
            if split.rewards > 0 {
                let contract = self.env().account_id();
                self.move_balance(from, contract, split.rewards)?;
            }
            self.move_balance(from, to, net)
        }

        /// Everything `to` gains from the transfer, fee legs included when
        /// `to` is itself a fee destination.
        fn credited_to(&self, to: AccountId, net: Balance, split: &FeeSplit) -> Result<Balance, Error> {
            let mut credited = net;
            if to == self.marketing_wallet {
                credited = credited.checked_add(split.marketing).ok_or(Error::Overflow)?;
            }
            if to == self.env().account_id() {
                credited = credited.checked_add(split.rewards).ok_or(Error::Overflow)?;
            }
            Ok(credited)
        }

        /// Primitive ledger move. Keeps the holder registry in step with
        /// both balances and emits `Transfer`.
        fn move_balance(
            &mut self,
            from: AccountId,
            to: AccountId,
            amount: Balance,
        ) -> Result<(), Error> {
            let from_balance = self.balance_of(from);
            if from_balance < amount {
                return Err(Error::InsufficientBalance);
            }

            if from != to {
                let to_balance = self
                    .balance_of(to)
                    .checked_add(amount)
                    .ok_or(Error::Overflow)?;
                self.balances.insert(from, &(from_balance - amount));
                self.balances.insert(to, &to_balance);
            }

            let from_balance = self.balance_of(from);
            let to_balance = self.balance_of(to);
            self.holders.sync(from, from_balance);
            self.holders.sync(to, to_balance);

            self.env().emit_event(Transfer {
                from: Some(from),
                to: Some(to),
                value: amount,
            });
            Ok(())
        }

        // =====================================================================
        // REWARD DISTRIBUTION
        // =====================================================================

        /// Accepts native value into the rewards pool.
        #[ink(message, payable)]
        pub fn fund_rewards(&mut self) {
            self.env().emit_event(RewardsFunded {
                from: self.env().caller(),
                value: self.env().transferred_value(),
            });
        }

        /// Pays the whole native balance out to eligible holders.
        ///
        /// Returns the amount actually delivered. Callable by anyone; a
        /// second call while one is running fails with
        /// `DistributionInProgress`. The guard is the `distributing` cell,
        /// written to storage before any payout is sent.
        #[ink(message)]
        pub fn distribute_rewards(&mut self) -> Result<Balance, Error> {
            if self.is_distributing() {
                return Err(Error::DistributionInProgress);
            }

            self.distributing.set(&true);
            let outcome = self.run_distribution();
            self.distributing.set(&false);

            let (pool, outcome) = outcome?;
            self.env().emit_event(RewardsDistributed {
                pool,
                delivered: outcome.delivered,
                paid: outcome.paid,
                skipped: outcome.skipped,
            });
            Ok(outcome.delivered)
        }

        fn run_distribution(&self) -> Result<(Balance, Distribution), Error> {
            let pool = self.env().balance();
            let outcome = self.reward_pass().run(pool, |holder, payout| {
                self.env().transfer(holder, payout).map_err(|err| {
                    ink::env::debug_println!(
                        "reward payout of {} to {:?} skipped: {:?}",
                        payout,
                        holder,
                        err
                    );
                    err
                })
            })?;
            Ok((pool, outcome))
        }

        fn is_distributing(&self) -> bool {
            self.distributing.get().unwrap_or(false)
        }

        fn reward_pass(
            &self,
        ) -> RewardPass<
            AccountId,
            impl Iterator<Item = AccountId> + Clone + '_,
            impl Fn(&AccountId) -> Balance + '_,
            impl Fn(&AccountId) -> bool + '_,
        > {
            RewardPass {
                holders: self.holders.iter(),
                total_supply: self.total_supply,
                min_holding: self.min_holding_for_rewards,
                balance_of: move |account: &AccountId| self.balance_of(*account),
                is_excluded: move |account: &AccountId| self.is_reward_excluded(*account),
            }
        }

        // =====================================================================
        // QUERIES
        // =====================================================================

        #[ink(message)]
        pub fn holder_at(&self, index: u32) -> Result<AccountId, Error> {
            self.holders.at(index)
        }

        #[ink(message)]
        pub fn holder_count(&self) -> u32 {
            self.holders.count()
        }

        #[ink(message)]
        pub fn is_holder(&self, account: AccountId) -> bool {
            self.holders.contains(&account)
        }

        /// Supply held by holders that would be paid by the next
        /// distribution.
        #[ink(message)]
        pub fn get_total_eligible_balance(&self) -> Balance {
            self.reward_pass().eligible_total()
        }

        #[ink(message)]
        pub fn reward_pool_value(&self) -> Balance {
            self.env().balance()
        }

        #[ink(message)]
        pub fn fee_rates(&self) -> FeeRates {
            self.fee_rates
        }

        #[ink(message)]
        pub fn limits(&self) -> Limits {
            self.limits
        }

        #[ink(message)]
        pub fn max_transaction_amount(&self) -> Result<Balance, Error> {
            self.limits.max_transaction_amount(self.total_supply)
        }

        #[ink(message)]
        pub fn max_wallet_amount(&self) -> Result<Balance, Error> {
            self.limits.max_wallet_amount(self.total_supply)
        }

        #[ink(message)]
        pub fn min_holding_for_rewards(&self) -> Balance {
            self.min_holding_for_rewards
        }

        #[ink(message)]
        pub fn marketing_wallet(&self) -> AccountId {
            self.marketing_wallet
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        #[ink(message)]
        pub fn is_liquidity_pool(&self, account: AccountId) -> bool {
            self.liquidity_pools.get(account).unwrap_or(false)
        }

        #[ink(message)]
        pub fn is_fee_exempt(&self, account: AccountId) -> bool {
            self.fee_exempt.get(account).unwrap_or(false)
        }

        #[ink(message)]
        pub fn is_reward_excluded(&self, account: AccountId) -> bool {
            self.reward_excluded.get(account).unwrap_or(false)
        }

        // =====================================================================
        // ADMIN (owner only)
        // =====================================================================

        /// Sets buy, sell and plain-transfer fees, each given in basis
        /// points (≤ 10 000) and stored as whole percent.
        #[ink(message)]
        pub fn set_rates(
            &mut self,
            buy_bps: u16,
            sell_bps: u16,
            transfer_bps: u16,
        ) -> Result<(), Error> {
            self.ensure_owner()?;
            let buy = FeeRates::percent_from_bps(buy_bps)?;
            let sell = FeeRates::percent_from_bps(sell_bps)?;
            let transfer = FeeRates::percent_from_bps(transfer_bps)?;

            self.fee_rates.buy = buy;
            self.fee_rates.sell = sell;
            self.fee_rates.transfer = transfer;
            self.env().emit_event(FeesUpdated { buy, sell, transfer });
            Ok(())
        }

        #[ink(message)]
        pub fn set_rewards_percentage(&mut self, bps: u16) -> Result<(), Error> {
            self.ensure_owner()?;
            let percentage = FeeRates::percent_from_bps(bps)?;
            self.fee_rates.rewards_percentage = percentage;
            self.env().emit_event(RewardsPercentageUpdated { percentage });
            Ok(())
        }

        #[ink(message)]
        pub fn set_min_holding_for_rewards(&mut self, amount: Balance) -> Result<(), Error> {
            self.ensure_owner()?;
            self.min_holding_for_rewards = amount;
            self.env().emit_event(MinHoldingUpdated { amount });
            Ok(())
        }

        #[ink(message)]
        pub fn set_max_transaction_bps(&mut self, bps: u16) -> Result<(), Error> {
            self.ensure_owner()?;
            self.limits.max_transaction_bps = Limits::validate_bps(bps)?;
            self.emit_limits();
            Ok(())
        }

        #[ink(message)]
        pub fn set_max_wallet_bps(&mut self, bps: u16) -> Result<(), Error> {
            self.ensure_owner()?;
            self.limits.max_wallet_bps = Limits::validate_bps(bps)?;
            self.emit_limits();
            Ok(())
        }

        #[ink(message)]
        pub fn set_liquidity_pool(&mut self, pool: AccountId, enabled: bool) -> Result<(), Error> {
            self.ensure_owner()?;
            if is_zero_address(&pool) {
                return Err(Error::InvalidAddress);
            }
            self.liquidity_pools.insert(pool, &enabled);
            self.env().emit_event(LiquidityPoolUpdated { pool, enabled });
            Ok(())
        }

        #[ink(message)]
        pub fn set_fee_exempt(&mut self, account: AccountId, exempt: bool) -> Result<(), Error> {
            self.ensure_owner()?;
            self.fee_exempt.insert(account, &exempt);
            self.env().emit_event(FeeExemptionUpdated { account, exempt });
            Ok(())
        }

        #[ink(message)]
        pub fn set_reward_excluded(&mut self, account: AccountId, excluded: bool) -> Result<(), Error> {
            self.ensure_owner()?;
            self.reward_excluded.insert(account, &excluded);
            self.env().emit_event(RewardExclusionUpdated { account, excluded });
            Ok(())
        }

        #[ink(message)]
        pub fn set_marketing_wallet(&mut self, wallet: AccountId) -> Result<(), Error> {
            self.ensure_owner()?;
            if is_zero_address(&wallet) {
                return Err(Error::InvalidAddress);
            }
            self.marketing_wallet = wallet;
            self.env().emit_event(MarketingWalletUpdated { wallet });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<(), Error> {
            self.ensure_owner()?;
            if is_zero_address(&new_owner) {
                return Err(Error::InvalidAddress);
            }
            let previous = self.owner;
            self.owner = new_owner;
            self.env().emit_event(OwnershipTransferred { previous, new_owner });
            Ok(())
        }

        /// Moves tokens out of the contract's own balance (the accumulated
        /// rewards leg). No fee or limit applies.
        #[ink(message)]
        pub fn withdraw_stuck_tokens(&mut self, to: AccountId, amount: Balance) -> Result<(), Error> {
            self.ensure_owner()?;
            if is_zero_address(&to) {
                return Err(Error::InvalidAddress);
            }
            let contract = self.env().account_id();
            if amount > self.balance_of(contract) {
                return Err(Error::InsufficientBalance);
            }

            self.move_balance(contract, to, amount)?;
            self.env().emit_event(StuckTokensWithdrawn { to, amount });
            Ok(())
        }

        /// Sweeps `amount` of a PSP22 token held by this contract.
        #[ink(message)]
        pub fn withdraw_foreign_token(
            &mut self,
            token: AccountId,
            to: AccountId,
            amount: Balance,
        ) -> Result<(), Error> {
            self.ensure_owner()?;
            if is_zero_address(&token) || is_zero_address(&to) || token == self.env().account_id() {
                return Err(Error::InvalidAddress);
            }

            let held = self.foreign_balance(token)?;
            if held == 0 || amount > held {
                return Err(Error::InsufficientBalance);
            }

            let reply = build_call::<DefaultEnvironment>()
                .call(token)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!("PSP22::transfer")))
                        .push_arg(to)
                        .push_arg(amount)
                        .push_arg(Vec::<u8>::new()),
                )
                .returns::<core::result::Result<(), PSP22Error>>()
                .try_invoke();

            match reply {
                Ok(Ok(Ok(()))) => {
                    self.env().emit_event(ForeignTokenWithdrawn { token, to, amount });
                    Ok(())
                }
                _ => Err(Error::TransferFailed),
            }
        }

        /// Sends the entire native balance to the owner.
        #[ink(message)]
        pub fn withdraw_excess_native_value(&mut self) -> Result<Balance, Error> {
            self.ensure_owner()?;
            let amount = self.env().balance();
            if amount == 0 {
                return Err(Error::NoFundsAvailable);
            }

            let to = self.owner;
            self.env()
                .transfer(to, amount)
                .map_err(|_| Error::TransferFailed)?;
            self.env().emit_event(NativeWithdrawn { to, amount });
            Ok(amount)
        }

        fn foreign_balance(&self, token: AccountId) -> Result<Balance, Error> {
            build_call::<DefaultEnvironment>()
                .call(token)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!("PSP22::balance_of")))
                        .push_arg(self.env().account_id()),
                )
                .returns::<Balance>()
                .try_invoke()
                .map_err(|_| Error::TransferFailed)?
                .map_err(|_| Error::TransferFailed)
        }

        fn emit_limits(&self) {
            self.env().emit_event(LimitsUpdated {
                max_transaction_bps: self.limits.max_transaction_bps,
                max_wallet_bps: self.limits.max_wallet_bps,
            });
        }

        fn ensure_owner(&self) -> Result<(), Error> {
            if self.env().caller() != self.owner {
                return Err(Error::NotOwner);
            }
            Ok(())
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================
    //
    // Accounts: alice = deployer/owner (fee-exempt), bob = marketing wallet,
    // frank = liquidity pool where a test needs one. charlie, django and eve
    // are ordinary fee-paying holders.

}
