use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::types::SaleState;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleInitialized {
    pub owner: Address,
    pub wallet: Address,
    pub token: Address,
    pub accepted_token: Address,
    pub goal: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensPurchased {
    pub purchaser: Address,
    pub beneficiary: Address,
    pub value: i128,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExcessSent {
    pub beneficiary: Address,
    pub value: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensRepurchased {
    pub purchaser: Address,
    pub beneficiary: Address,
    pub value: i128,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CrowdsaleFinalized {
    pub state: SaleState,
    pub raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CrowdsaleClosed {
    pub raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundsEnabled {
    pub raised: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsEnabled {
    pub repurchaser: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundWithdrawn {
    pub refundee: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensClaimed {
    pub beneficiary: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardWithdrawn {
    pub rewardee: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RaisedWithdrawn {
    pub wallet: Address,
    pub amount: i128,
}

pub fn emit_sale_initialized(
    env: &Env,
    owner: Address,
    wallet: Address,
    token: Address,
    accepted_token: Address,
    goal: i128,
) {
    let topics = (symbol_short!("init"),);
    let data = SaleInitialized {
        owner,
        wallet,
        token,
        accepted_token,
        goal,
    };
    env.events().publish(topics, data);
}

pub fn emit_tokens_purchased(
    env: &Env,
    purchaser: Address,
    beneficiary: Address,
    value: i128,
    amount: i128,
) {
    let topics = (symbol_short!("purchased"), beneficiary.clone());
    let data = TokensPurchased {
        purchaser,
        beneficiary,
        value,
        amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_excess_sent(env: &Env, beneficiary: Address, value: i128) {
    let topics = (symbol_short!("excess"), beneficiary.clone());
    env.events().publish(topics, ExcessSent { beneficiary, value });
}

pub fn emit_tokens_repurchased(
    env: &Env,
    purchaser: Address,
    beneficiary: Address,
    value: i128,
    amount: i128,
) {
    let topics = (symbol_short!("repurch"), beneficiary.clone());
    let data = TokensRepurchased {
        purchaser,
        beneficiary,
        value,
        amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_crowdsale_finalized(env: &Env, state: SaleState, raised: i128) {
    let topics = (symbol_short!("finalized"),);
    env.events()
        .publish(topics, CrowdsaleFinalized { state, raised });
}

pub fn emit_crowdsale_closed(env: &Env, raised: i128) {
    let topics = (symbol_short!("closed"),);
    env.events().publish(topics, CrowdsaleClosed { raised });
}

pub fn emit_refunds_enabled(env: &Env, raised: i128) {
    let topics = (symbol_short!("refunds"),);
    env.events().publish(topics, RefundsEnabled { raised });
}

pub fn emit_rewards_enabled(env: &Env, repurchaser: Option<Address>) {
    let topics = (symbol_short!("rewards"),);
    env.events().publish(topics, RewardsEnabled { repurchaser });
}

pub fn emit_refund_withdrawn(env: &Env, refundee: Address, amount: i128) {
    let topics = (symbol_short!("refunded"), refundee.clone());
    env.events()
        .publish(topics, RefundWithdrawn { refundee, amount });
}

pub fn emit_tokens_claimed(env: &Env, beneficiary: Address, amount: i128) {
    let topics = (symbol_short!("claimed"), beneficiary.clone());
    env.events()
        .publish(topics, TokensClaimed { beneficiary, amount });
}

pub fn emit_reward_withdrawn(env: &Env, rewardee: Address, amount: i128) {
    let topics = (symbol_short!("rewarded"), rewardee.clone());
    env.events()
        .publish(topics, RewardWithdrawn { rewardee, amount });
}

pub fn emit_raised_withdrawn(env: &Env, wallet: Address, amount: i128) {
    let topics = (symbol_short!("withdrawn"), wallet.clone());
    env.events()
        .publish(topics, RaisedWithdrawn { wallet, amount });
}
