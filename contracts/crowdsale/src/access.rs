//! # Access control
//!
//! Two privileged roles plus a whitelist:
//!
//! ```text
//! Owner ──► appoints Admin, transfers ownership, pauses
//!   └─┬─ Admin
//!     └──► whitelist management, withdraw of raised funds
//! ```
//!
//! ## Storage layout
//!
//! - `DataKey::Owner` → `Address`
//! - `DataKey::Admin` → `Address` (equal to the owner until one is appointed)
//! - `DataKey::Whitelisted(addr)` → `bool`
//!
//! ## Event emissions
//!
//! | Event topic prefix | Trigger |
//! |--------------------|---------|
//! | `owner_set`        | Ownership assigned or transferred |
//! | `admin_set`        | Admin replaced |
//! | `wl_add`           | Account newly whitelisted |
//! | `wl_del`           | Account removed from the whitelist |
//! | `paused`           | Purchases halted by the owner |
//! | `unpaused`         | Purchases resumed by the owner |
//!
//! Every guard takes the caller explicitly and requires its authorization
//! before checking the role.

use soroban_sdk::{panic_with_error, symbol_short, Address, Env};

use crate::storage;
use crate::Error;

// ─────────────────────────────────────────────────────────
// Initialisation
// ─────────────────────────────────────────────────────────

/// Store `owner` and make it the initial admin.
pub fn init_roles(env: &Env, owner: &Address) {
    storage::set_owner(env, owner);
    storage::set_admin(env, owner);
    env.events()
        .publish((symbol_short!("owner_set"), owner.clone()), None::<Address>);
}

// ─────────────────────────────────────────────────────────
// Role queries
// ─────────────────────────────────────────────────────────

pub fn owner(env: &Env) -> Address {
    storage::get_owner(env).unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

pub fn admin(env: &Env) -> Address {
    storage::get_admin(env).unwrap_or_else(|| panic_with_error!(env, Error::NotInitialized))
}

// ─────────────────────────────────────────────────────────
// Guards
// ─────────────────────────────────────────────────────────

/// Assert that `caller` authorized the call and is the owner.
pub fn require_owner(env: &Env, caller: &Address) {
    caller.require_auth();
    if *caller != owner(env) {
        panic_with_error!(env, Error::Unauthorized);
    }
}

/// Assert that `caller` authorized the call and is the owner or the admin.
pub fn require_owner_or_admin(env: &Env, caller: &Address) {
    caller.require_auth();
    if *caller != owner(env) && *caller != admin(env) {
        panic_with_error!(env, Error::Unauthorized);
    }
}

pub fn require_whitelisted(env: &Env, account: &Address) {
    if !storage::is_whitelisted(env, account) {
        panic_with_error!(env, Error::NotWhitelisted);
    }
}

// ─────────────────────────────────────────────────────────
// Role assignment
// ─────────────────────────────────────────────────────────

/// Replace the admin. Owner only.
pub fn change_admin(env: &Env, caller: &Address, new_admin: &Address) {
    require_owner(env, caller);
    let previous = admin(env);
    storage::set_admin(env, new_admin);
    env.events().publish(
        (symbol_short!("admin_set"), new_admin.clone()),
        Some(previous),
    );
}

/// Hand the owner role to `new_owner`. Owner only.
///
/// The admin is left untouched.
pub fn transfer_ownership(env: &Env, caller: &Address, new_owner: &Address) {
    require_owner(env, caller);
    storage::set_owner(env, new_owner);
    env.events().publish(
        (symbol_short!("owner_set"), new_owner.clone()),
        Some(caller.clone()),
    );
}

// ─────────────────────────────────────────────────────────
// Whitelist
// ─────────────────────────────────────────────────────────

/// Add `account` to the whitelist. Re-adding is a silent no-op.
pub fn add_to_whitelist(env: &Env, caller: &Address, account: &Address) {
    require_owner_or_admin(env, caller);
    if storage::is_whitelisted(env, account) {
        return;
    }
    storage::set_whitelisted(env, account);
    env.events().publish(
        (symbol_short!("wl_add"), account.clone()),
        Some(caller.clone()),
    );
}

/// Remove `account` from the whitelist. Pending positions stay intact.
pub fn remove_from_whitelist(env: &Env, caller: &Address, account: &Address) {
    require_owner_or_admin(env, caller);
    if !storage::is_whitelisted(env, account) {
        return;
    }
    storage::clear_whitelisted(env, account);
    env.events().publish(
        (symbol_short!("wl_del"), account.clone()),
        Some(caller.clone()),
    );
}

// ─────────────────────────────────────────────────────────
// Pause events
// ─────────────────────────────────────────────────────────

pub fn emit_paused(env: &Env, caller: &Address) {
    env.events()
        .publish((symbol_short!("paused"),), caller.clone());
}

pub fn emit_unpaused(env: &Env, caller: &Address) {
    env.events()
        .publish((symbol_short!("unpaused"),), caller.clone());
}
