//! # Crowdsale Contract
//!
//! A whitelisted, time-boxed token sale that escrows payments until a
//! one-shot finalization decides how they settle.
//!
//! | Phase        | Entry Point(s)                                         |
//! |--------------|--------------------------------------------------------|
//! | Bootstrap    | [`Crowdsale::init`]                                    |
//! | Role admin   | `change_admin`, `transfer_ownership`, `pause`, `unpause` |
//! | Whitelist    | `add_to_whitelist`, `remove_from_whitelist`            |
//! | Purchase     | `buy`, `buy_to_beneficiary`                            |
//! | Buyout       | `repurchase`, `repurchase_to_beneficiary`              |
//! | Finalization | [`Crowdsale::finalize`]                                |
//! | Settlement   | `claim_refund`, `claim_tokens`, `claim_reward`, `claim_repurchased_tokens`, `withdraw` |
//! | Queries      | `sale_info`, `raised`, `state`, `deposits_of`, `balance_of`, ... |
//!
//! ## Architecture
//!
//! Roles and the whitelist are delegated to [`access`]. Storage access is
//! delegated to [`storage`], arithmetic to [`math`]. This file holds the entry
//! points and the sale state machine.
//!
//! Every failure aborts the invocation with a contract [`Error`]; the host
//! discards all storage writes and token transfers made before the failure.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, panic_with_error, token, Address, Env,
};

pub mod access;
pub mod events;
pub mod math;
mod storage;
mod types;

#[cfg(test)]
mod test_events;

pub use types::{Position, SaleConfig, SaleInfo, SaleState, SaleStatus};

contractmeta!(
    key = "Description",
    val = "Whitelisted goal-based crowdsale with escrow, refunds and repurchase rewards"
);

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidParameter = 4,
    NotOpen = 5,
    NotYetClosed = 6,
    NotWhitelisted = 7,
    InsufficientFunds = 8,
    AlreadyFinalized = 9,
    NotFinalized = 10,
    WrongState = 11,
    NothingToClaim = 12,
    AlreadyRepurchased = 13,
    InvalidAmount = 14,
    GoalReached = 15,
    AlreadyWithdrawn = 16,
    Paused = 17,
    NotPaused = 18,
    Overflow = 19,
    RepurchaserIsInvestor = 20,
}

#[contract]
pub struct Crowdsale;

#[contractimpl]
impl Crowdsale {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the sale with immutable parameters.
    ///
    /// Must be called exactly once after deployment; `owner` must sign and
    /// also becomes the initial admin. The sale tokens (`goal * rate`) are
    /// expected to be transferred to the contract separately.
    pub fn init(env: Env, owner: Address, config: SaleConfig) {
        owner.require_auth();
        if storage::is_initialized(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        Self::validate_config(&env, &config);

        storage::save_config(&env, &config);
        storage::save_status(&env, &SaleStatus::new());
        access::init_roles(&env, &owner);

        events::emit_sale_initialized(
            &env,
            owner,
            config.wallet,
            config.token,
            config.accepted_token,
            config.goal,
        );
    }

    // ─────────────────────────────────────────────────────────
    // Role management
    // ─────────────────────────────────────────────────────────

    /// Replace the admin. Owner only.
    pub fn change_admin(env: Env, caller: Address, new_admin: Address) {
        Self::require_initialized(&env);
        access::change_admin(&env, &caller, &new_admin);
    }

    /// Transfer ownership. Owner only.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) {
        Self::require_initialized(&env);
        access::transfer_ownership(&env, &caller, &new_owner);
    }

    /// Allow purchases credited to `account`. Owner or admin.
    pub fn add_to_whitelist(env: Env, caller: Address, account: Address) {
        Self::require_initialized(&env);
        access::add_to_whitelist(&env, &caller, &account);
    }

    /// Stop new purchases credited to `account`. Owner or admin.
    pub fn remove_from_whitelist(env: Env, caller: Address, account: Address) {
        Self::require_initialized(&env);
        access::remove_from_whitelist(&env, &caller, &account);
    }

    // ─────────────────────────────────────────────────────────
    // Emergency Control
    // ─────────────────────────────────────────────────────────

    /// Halt purchases and repurchases. Owner only.
    pub fn pause(env: Env, caller: Address) {
        let mut status = Self::load_status(&env);
        access::require_owner(&env, &caller);
        if status.paused {
            panic_with_error!(&env, Error::Paused);
        }
        status.paused = true;
        storage::save_status(&env, &status);
        access::emit_paused(&env, &caller);
    }

    /// Resume purchases. Owner only.
    pub fn unpause(env: Env, caller: Address) {
        let mut status = Self::load_status(&env);
        access::require_owner(&env, &caller);
        if !status.paused {
            panic_with_error!(&env, Error::NotPaused);
        }
        status.paused = false;
        storage::save_status(&env, &status);
        access::emit_unpaused(&env, &caller);
    }

    // ─────────────────────────────────────────────────────────
    // Purchase
    // ─────────────────────────────────────────────────────────

    /// Buy `amount` sale tokens for the purchaser itself.
    pub fn buy(env: Env, purchaser: Address, amount: i128) {
        Self::buy_to_beneficiary(env, purchaser.clone(), amount, purchaser);
    }

    /// Buy `amount` sale tokens, paid by `purchaser`, credited to `beneficiary`.
    ///
    /// The purchaser must have approved at least `amount / rate` of the
    /// accepted token to this contract. Value above the remaining room to the
    /// goal is forwarded to the beneficiary; the beneficiary is still credited
    /// with the full `amount`.
    pub fn buy_to_beneficiary(env: Env, purchaser: Address, amount: i128, beneficiary: Address) {
        purchaser.require_auth();
        let config = Self::load_config(&env);
        let mut status = Self::load_status(&env);
        Self::require_open(&env, &config, &status);

        if amount <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        let value = Self::checked(&env, math::value_for(amount, config.rate));
        if value <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        access::require_whitelisted(&env, &beneficiary);
        if status.goal_reached(&config) {
            panic_with_error!(&env, Error::GoalReached);
        }

        let (collected, excess) =
            Self::checked(&env, math::split_excess(status.raised, config.goal, value));

        // Pull the full value, then hand any excess to the beneficiary.
        let accepted = token::Client::new(&env, &config.accepted_token);
        Self::pull_funds(&env, &accepted, &purchaser, value);
        if excess > 0 {
            accepted.transfer(&env.current_contract_address(), &beneficiary, &excess);
            events::emit_excess_sent(&env, beneficiary.clone(), excess);
        }

        let mut position = storage::load_position(&env, &beneficiary);
        let deposit_before = position.deposit;
        position.deposit = Self::checked(&env, position.deposit.checked_add(collected));
        position.balance = Self::checked(&env, position.balance.checked_add(amount));

        let reward_delta = Self::checked(
            &env,
            math::reward_delta(deposit_before, position.deposit, config.rewards_percent),
        );
        status.raised = Self::checked(&env, status.raised.checked_add(collected));
        status.tokens_sold = Self::checked(&env, status.tokens_sold.checked_add(amount));
        status.reward_obligations =
            Self::checked(&env, status.reward_obligations.checked_add(reward_delta));

        storage::save_position(&env, &beneficiary, &position);
        storage::save_status(&env, &status);

        events::emit_tokens_purchased(&env, purchaser, beneficiary, collected, amount);
    }

    // ─────────────────────────────────────────────────────────
    // Repurchase
    // ─────────────────────────────────────────────────────────

    /// Buy out the whole sale supply for the purchaser itself.
    pub fn repurchase(env: Env, purchaser: Address) {
        Self::repurchase_to_beneficiary(env, purchaser.clone(), purchaser);
    }

    /// Buy out the whole sale supply for `beneficiary` in one payment.
    ///
    /// The price is the full goal plus every reward already owed to existing
    /// investors (see [`Crowdsale::repurchase_price`]). Allowed once, only
    /// while the goal is unreached.
    pub fn repurchase_to_beneficiary(env: Env, purchaser: Address, beneficiary: Address) {
        purchaser.require_auth();
        let config = Self::load_config(&env);
        let mut status = Self::load_status(&env);
        Self::require_open(&env, &config, &status);
        access::require_whitelisted(&env, &beneficiary);

        if status.tokens_repurchased {
            panic_with_error!(&env, Error::AlreadyRepurchased);
        }
        if status.goal_reached(&config) {
            panic_with_error!(&env, Error::GoalReached);
        }
        let mut position = storage::load_position(&env, &beneficiary);
        if position.deposit > 0 {
            panic_with_error!(&env, Error::RepurchaserIsInvestor);
        }

        let price = Self::checked(&env, config.goal.checked_add(status.reward_obligations));
        let supply = Self::checked(&env, math::tokens_for_sale(config.goal, config.rate));

        let accepted = token::Client::new(&env, &config.accepted_token);
        Self::pull_funds(&env, &accepted, &purchaser, price);

        position.balance = Self::checked(&env, position.balance.checked_add(supply));
        status.raised = config.goal;
        status.tokens_sold = Self::checked(&env, status.tokens_sold.checked_add(supply));
        status.tokens_repurchased = true;
        status.repurchaser = Some(beneficiary.clone());

        storage::save_position(&env, &beneficiary, &position);
        storage::save_status(&env, &status);

        events::emit_tokens_repurchased(&env, purchaser, beneficiary, price, supply);
    }

    // ─────────────────────────────────────────────────────────
    // Finalization
    // ─────────────────────────────────────────────────────────

    /// Decide the terminal state. Callable by anyone, once, after closing
    /// time or as soon as the goal is reached.
    pub fn finalize(env: Env) {
        let config = Self::load_config(&env);
        let mut status = Self::load_status(&env);

        if status.finalized {
            panic_with_error!(&env, Error::AlreadyFinalized);
        }
        if !Self::closed(&env, &config) && !status.goal_reached(&config) {
            panic_with_error!(&env, Error::NotYetClosed);
        }

        status.state = if status.tokens_repurchased {
            events::emit_rewards_enabled(&env, status.repurchaser.clone());
            SaleState::Rewarding
        } else if status.goal_reached(&config) {
            events::emit_crowdsale_closed(&env, status.raised);
            SaleState::Closed
        } else {
            events::emit_refunds_enabled(&env, status.raised);
            SaleState::Refunding
        };
        status.finalized = true;
        storage::save_status(&env, &status);

        events::emit_crowdsale_finalized(&env, status.state, status.raised);
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Return the escrowed deposit of `beneficiary`. `Refunding` only.
    pub fn claim_refund(env: Env, beneficiary: Address) {
        let config = Self::load_config(&env);
        Self::require_settling(&env, SaleState::Refunding);

        let position = storage::load_position(&env, &beneficiary);
        if position.deposit <= 0 {
            panic_with_error!(&env, Error::NothingToClaim);
        }

        storage::save_position(&env, &beneficiary, &Position::default());
        token::Client::new(&env, &config.accepted_token).transfer(
            &env.current_contract_address(),
            &beneficiary,
            &position.deposit,
        );

        events::emit_refund_withdrawn(&env, beneficiary, position.deposit);
    }

    /// Deliver the purchased sale tokens of `beneficiary`. `Closed` only.
    pub fn claim_tokens(env: Env, beneficiary: Address) {
        let config = Self::load_config(&env);
        Self::require_settling(&env, SaleState::Closed);

        let position = storage::load_position(&env, &beneficiary);
        if position.balance <= 0 {
            panic_with_error!(&env, Error::NothingToClaim);
        }

        storage::save_position(&env, &beneficiary, &Position::default());
        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &beneficiary,
            &position.balance,
        );

        events::emit_tokens_claimed(&env, beneficiary, position.balance);
    }

    /// Pay `beneficiary` its deposit plus reward. `Rewarding` only; the
    /// repurchaser is not an investor and gets nothing here.
    pub fn claim_reward(env: Env, beneficiary: Address) {
        let config = Self::load_config(&env);
        let status = Self::require_settling(&env, SaleState::Rewarding);

        let position = storage::load_position(&env, &beneficiary);
        if status.is_repurchaser(&beneficiary) || position.deposit <= 0 {
            panic_with_error!(&env, Error::NothingToClaim);
        }
        let payout = Self::checked(
            &env,
            math::payout_with_reward(position.deposit, config.rewards_percent),
        );

        storage::save_position(&env, &beneficiary, &Position::default());
        token::Client::new(&env, &config.accepted_token).transfer(
            &env.current_contract_address(),
            &beneficiary,
            &payout,
        );

        events::emit_reward_withdrawn(&env, beneficiary, payout);
    }

    /// Deliver the bought-out supply to the repurchaser. `Rewarding` only.
    pub fn claim_repurchased_tokens(env: Env) {
        let config = Self::load_config(&env);
        let status = Self::require_settling(&env, SaleState::Rewarding);

        let repurchaser = match status.repurchaser {
            Some(address) => address,
            None => panic_with_error!(&env, Error::WrongState),
        };
        let position = storage::load_position(&env, &repurchaser);
        if position.balance <= 0 {
            panic_with_error!(&env, Error::NothingToClaim);
        }

        storage::save_position(&env, &repurchaser, &Position::default());
        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &repurchaser,
            &position.balance,
        );

        events::emit_tokens_claimed(&env, repurchaser, position.balance);
    }

    /// Move the raised funds to the wallet. Owner or admin, once, after a
    /// successful finalization (`Closed` or `Rewarding`).
    pub fn withdraw(env: Env, caller: Address) {
        let config = Self::load_config(&env);
        let mut status = Self::load_status(&env);
        access::require_owner_or_admin(&env, &caller);

        if !status.finalized {
            panic_with_error!(&env, Error::NotFinalized);
        }
        if status.state == SaleState::Refunding {
            panic_with_error!(&env, Error::WrongState);
        }
        if status.raised_withdrawn {
            panic_with_error!(&env, Error::AlreadyWithdrawn);
        }

        status.raised_withdrawn = true;
        storage::save_status(&env, &status);
        token::Client::new(&env, &config.accepted_token).transfer(
            &env.current_contract_address(),
            &config.wallet,
            &status.raised,
        );

        events::emit_raised_withdrawn(&env, config.wallet, status.raised);
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Address {
        access::owner(&env)
    }

    pub fn admin(env: Env) -> Address {
        access::admin(&env)
    }

    pub fn wallet(env: Env) -> Address {
        Self::load_config(&env).wallet
    }

    pub fn token(env: Env) -> Address {
        Self::load_config(&env).token
    }

    pub fn accepted_token(env: Env) -> Address {
        Self::load_config(&env).accepted_token
    }

    pub fn rate(env: Env) -> i128 {
        Self::load_config(&env).rate
    }

    pub fn goal(env: Env) -> i128 {
        Self::load_config(&env).goal
    }

    pub fn rewards_percent(env: Env) -> u32 {
        Self::load_config(&env).rewards_percent
    }

    pub fn opening_time(env: Env) -> u64 {
        Self::load_config(&env).opening_time
    }

    pub fn closing_time(env: Env) -> u64 {
        Self::load_config(&env).closing_time
    }

    pub fn raised(env: Env) -> i128 {
        Self::load_status(&env).raised
    }

    pub fn state(env: Env) -> SaleState {
        Self::load_status(&env).state
    }

    pub fn finalized(env: Env) -> bool {
        Self::load_status(&env).finalized
    }

    pub fn paused(env: Env) -> bool {
        Self::load_status(&env).paused
    }

    pub fn tokens_repurchased(env: Env) -> bool {
        Self::load_status(&env).tokens_repurchased
    }

    pub fn raised_withdrawn(env: Env) -> bool {
        Self::load_status(&env).raised_withdrawn
    }

    pub fn repurchaser(env: Env) -> Option<Address> {
        Self::load_status(&env).repurchaser
    }

    /// Payment-token value escrowed for `beneficiary`.
    pub fn deposits_of(env: Env, beneficiary: Address) -> i128 {
        storage::load_position(&env, &beneficiary).deposit
    }

    /// Sale tokens pending delivery to `beneficiary`.
    pub fn balance_of(env: Env, beneficiary: Address) -> i128 {
        storage::load_position(&env, &beneficiary).balance
    }

    pub fn is_whitelisted(env: Env, account: Address) -> bool {
        storage::is_whitelisted(&env, &account)
    }

    /// True inside the sale window while not paused.
    pub fn is_open(env: Env) -> bool {
        let config = Self::load_config(&env);
        let status = Self::load_status(&env);
        Self::window_open(&env, &config) && !status.paused
    }

    pub fn has_closed(env: Env) -> bool {
        let config = Self::load_config(&env);
        Self::closed(&env, &config)
    }

    pub fn goal_reached(env: Env) -> bool {
        let config = Self::load_config(&env);
        Self::load_status(&env).goal_reached(&config)
    }

    /// Rewards currently owed to investors should a repurchase happen.
    pub fn reward_obligations(env: Env) -> i128 {
        Self::load_status(&env).reward_obligations
    }

    /// Exact payment a repurchase would pull right now.
    pub fn repurchase_price(env: Env) -> i128 {
        let config = Self::load_config(&env);
        let status = Self::load_status(&env);
        Self::checked(&env, config.goal.checked_add(status.reward_obligations))
    }

    /// Snapshot of parameters, roles and state.
    pub fn sale_info(env: Env) -> SaleInfo {
        let config = Self::load_config(&env);
        let status = Self::load_status(&env);
        SaleInfo {
            owner: access::owner(&env),
            admin: access::admin(&env),
            goal_reached: status.goal_reached(&config),
            is_open: Self::window_open(&env, &config) && !status.paused,
            has_closed: Self::closed(&env, &config),
            config,
            status,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Internal Helpers
// ─────────────────────────────────────────────────────────

impl Crowdsale {
    fn validate_config(env: &Env, config: &SaleConfig) {
        let this = env.current_contract_address();
        let now = env.ledger().timestamp();
        let invalid = config.rate <= 0
            || config.goal <= 0
            || config.rewards_percent == 0
            || config.rewards_percent as i128 > math::BASIS_POINTS
            || config.opening_time < now
            || config.closing_time <= config.opening_time
            || config.accepted_token == config.token
            || config.token == this
            || config.accepted_token == this
            || config.wallet == this;
        if invalid {
            panic_with_error!(env, Error::InvalidParameter);
        }
        // The full supply and a reward on the whole goal must be expressible.
        if math::tokens_for_sale(config.goal, config.rate).is_none()
            || math::payout_with_reward(config.goal, config.rewards_percent).is_none()
        {
            panic_with_error!(env, Error::InvalidParameter);
        }
    }

    fn require_initialized(env: &Env) {
        if !storage::is_initialized(env) {
            panic_with_error!(env, Error::NotInitialized);
        }
    }

    fn load_config(env: &Env) -> SaleConfig {
        storage::load_config(env).unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
    }

    fn load_status(env: &Env) -> SaleStatus {
        storage::load_status(env).unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
    }

    fn window_open(env: &Env, config: &SaleConfig) -> bool {
        let now = env.ledger().timestamp();
        now >= config.opening_time && now < config.closing_time
    }

    fn closed(env: &Env, config: &SaleConfig) -> bool {
        env.ledger().timestamp() >= config.closing_time
    }

    /// Purchases require an unpaused sale inside its window.
    fn require_open(env: &Env, config: &SaleConfig, status: &SaleStatus) {
        if status.paused {
            panic_with_error!(env, Error::Paused);
        }
        if status.finalized || !Self::window_open(env, config) {
            panic_with_error!(env, Error::NotOpen);
        }
    }

    /// Settlement requires a finalized sale in `expected` state.
    fn require_settling(env: &Env, expected: SaleState) -> SaleStatus {
        let status = Self::load_status(env);
        if !status.finalized {
            panic_with_error!(env, Error::NotFinalized);
        }
        if status.state != expected {
            panic_with_error!(env, Error::WrongState);
        }
        status
    }

    /// Pull exactly `value` from `purchaser` through its allowance.
    fn pull_funds(env: &Env, accepted: &token::Client<'_>, purchaser: &Address, value: i128) {
        let this = env.current_contract_address();
        if accepted.allowance(purchaser, &this) < value || accepted.balance(purchaser) < value {
            panic_with_error!(env, Error::InsufficientFunds);
        }
        accepted.transfer_from(&this, purchaser, &this, &value);
    }

    fn checked<T>(env: &Env, value: Option<T>) -> T {
        value.unwrap_or_else(|| panic_with_error!(env, Error::Overflow))
    }
}
