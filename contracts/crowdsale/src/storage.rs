//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the crowdsale.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key       | Type         | Description                          |
//! |-----------|--------------|--------------------------------------|
//! | `Config`  | `SaleConfig` | Immutable sale parameters            |
//! | `Status`  | `SaleStatus` | Aggregate mutable state              |
//! | `Owner`   | `Address`    | Owner role                           |
//! | `Admin`   | `Address`    | Admin role                           |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                  | Type       | Description                        |
//! |----------------------|------------|------------------------------------|
//! | `Position(addr)`     | `Position` | Deposit + pending tokens of `addr` |
//! | `Whitelisted(addr)`  | `bool`     | Whitelist membership               |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining. Absent entries are never bumped; an empty position is removed
//! instead of being stored as zeros.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Position, SaleConfig, SaleStatus};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable sale parameters (Instance).
    Config,
    /// Aggregate mutable state (Instance).
    Status,
    /// Owner address (Instance).
    Owner,
    /// Admin address (Instance).
    Admin,
    /// Per-beneficiary deposit and token balance (Persistent).
    Position(Address),
    /// Whitelist flag (Persistent).
    Whitelisted(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

/// Load the sale parameters, or `None` before `init`.
pub fn load_config(env: &Env) -> Option<SaleConfig> {
    let config = env.storage().instance().get(&DataKey::Config);
    if config.is_some() {
        bump_instance(env);
    }
    config
}

pub fn save_status(env: &Env, status: &SaleStatus) {
    env.storage().instance().set(&DataKey::Status, status);
    bump_instance(env);
}

pub fn load_status(env: &Env) -> Option<SaleStatus> {
    env.storage().instance().get(&DataKey::Status)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Owner)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Load the position of `beneficiary`; zeros if it never bought.
pub fn load_position(env: &Env, beneficiary: &Address) -> Position {
    let key = DataKey::Position(beneficiary.clone());
    match env.storage().persistent().get::<DataKey, Position>(&key) {
        Some(position) => {
            bump_persistent(env, &key);
            position
        }
        None => Position::default(),
    }
}

/// Persist `position`, dropping the entry once it is fully settled.
pub fn save_position(env: &Env, beneficiary: &Address, position: &Position) {
    let key = DataKey::Position(beneficiary.clone());
    if position.is_empty() {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, position);
    bump_persistent(env, &key);
}

pub fn is_whitelisted(env: &Env, account: &Address) -> bool {
    let key = DataKey::Whitelisted(account.clone());
    let listed = env.storage().persistent().get(&key).unwrap_or(false);
    if listed {
        bump_persistent(env, &key);
    }
    listed
}

pub fn set_whitelisted(env: &Env, account: &Address) {
    let key = DataKey::Whitelisted(account.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}

pub fn clear_whitelisted(env: &Env, account: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Whitelisted(account.clone()));
}
