//! # Types
//!
//! Shared data structures used across all modules of the crowdsale.
//!
//! ## Design decisions
//!
//! ### Config / Status split
//!
//! The sale is stored as two separate instance entries:
//!
//! - [`SaleConfig`]: written once by `init`; never mutated.
//! - [`SaleStatus`]: written on every purchase, finalization and settlement.
//!
//! Per-beneficiary bookkeeping lives in a third, persistent entry
//! ([`Position`]) so that a deposit and its pending token balance are always
//! written and cleared together.
//!
//! ### State as a Finite-State Machine
//!
//! [`SaleState`] moves exactly once, at `finalize`:
//!
//! ```text
//! Active ──► Closed      (goal reached by purchases)
//!     ├───► Refunding   (closed with goal unreached)
//!     └───► Rewarding   (supply bought out by a repurchase)
//! ```
//!
//! All three outcomes are terminal.

use soroban_sdk::{contracttype, Address};

/// Lifecycle of the sale. Discriminants are part of the public interface.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum SaleState {
    /// Accepting purchases (subject to window and pause); not finalized.
    Active = 0,
    /// Goal reached through purchases; investors claim tokens.
    Closed = 1,
    /// Window closed below goal; investors claim refunds.
    Refunding = 2,
    /// Supply bought out; investors claim deposit plus reward.
    Rewarding = 3,
}

/// Immutable sale parameters, supplied to `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    /// Receives the raised funds on `withdraw`.
    pub wallet: Address,
    /// Token being sold.
    pub token: Address,
    /// Token accepted as payment.
    pub accepted_token: Address,
    /// Sale-token units per payment-token unit: `value = amount / rate`.
    pub rate: i128,
    /// Target raise, in payment-token units.
    pub goal: i128,
    /// Reward paid on top of a deposit after a repurchase, in basis points.
    pub rewards_percent: u32,
    pub opening_time: u64,
    pub closing_time: u64,
}

/// Mutable aggregate state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleStatus {
    pub state: SaleState,
    /// Payment-token value collected by purchases (capped at `goal`).
    pub raised: i128,
    /// Sale-token amount credited to all beneficiaries.
    pub tokens_sold: i128,
    /// Sum of the per-investor rewards owed if a repurchase happens.
    pub reward_obligations: i128,
    pub paused: bool,
    pub finalized: bool,
    pub tokens_repurchased: bool,
    pub raised_withdrawn: bool,
    /// Beneficiary of the repurchase, once it happened.
    pub repurchaser: Option<Address>,
}

impl SaleStatus {
    pub fn new() -> Self {
        Self {
            state: SaleState::Active,
            raised: 0,
            tokens_sold: 0,
            reward_obligations: 0,
            paused: false,
            finalized: false,
            tokens_repurchased: false,
            raised_withdrawn: false,
            repurchaser: None,
        }
    }

    /// True once `raised` has hit the goal.
    pub fn goal_reached(&self, config: &SaleConfig) -> bool {
        self.raised >= config.goal
    }

    pub fn is_repurchaser(&self, address: &Address) -> bool {
        self.repurchaser.as_ref() == Some(address)
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// What the sale owes one beneficiary.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Position {
    /// Escrowed payment-token value.
    pub deposit: i128,
    /// Sale tokens pending delivery.
    pub balance: i128,
}

impl Position {
    pub fn is_empty(&self) -> bool {
        self.deposit == 0 && self.balance == 0
    }
}

/// Read-only snapshot returned by `sale_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleInfo {
    pub owner: Address,
    pub admin: Address,
    pub config: SaleConfig,
    pub status: SaleStatus,
    pub goal_reached: bool,
    pub is_open: bool,
    pub has_closed: bool,
}
