//! Checked arithmetic for pricing, goal capping and rewards.
//!
//! Every function returns `None` on overflow; callers map that to
//! `Error::Overflow`.

/// Denominator of `rewards_percent`.
pub const BASIS_POINTS: i128 = 10_000;

/// Payment value of `amount` sale tokens: `amount / rate`, rounded down.
pub fn value_for(amount: i128, rate: i128) -> Option<i128> {
    amount.checked_div(rate)
}

/// Sale-token supply backing the whole goal.
pub fn tokens_for_sale(goal: i128, rate: i128) -> Option<i128> {
    goal.checked_mul(rate)
}

/// Split a payment of `value` into the part collected towards the goal and
/// the excess above it. Returns `(collected, excess)`.
pub fn split_excess(raised: i128, goal: i128, value: i128) -> Option<(i128, i128)> {
    let room = goal.checked_sub(raised)?.max(0);
    if value > room {
        Some((room, value.checked_sub(room)?))
    } else {
        Some((value, 0))
    }
}

/// Reward owed on `deposit` after a repurchase, rounded down.
pub fn reward_for(deposit: i128, rewards_percent: u32) -> Option<i128> {
    deposit
        .checked_mul(rewards_percent as i128)?
        .checked_div(BASIS_POINTS)
}

/// Deposit plus its reward.
pub fn payout_with_reward(deposit: i128, rewards_percent: u32) -> Option<i128> {
    deposit.checked_add(reward_for(deposit, rewards_percent)?)
}

/// Change in one investor's reward when its deposit moves from `before` to
/// `after`. Summing these deltas keeps the aggregate equal to the sum of
/// per-investor rounded rewards.
pub fn reward_delta(before: i128, after: i128, rewards_percent: u32) -> Option<i128> {
    reward_for(after, rewards_percent)?.checked_sub(reward_for(before, rewards_percent)?)
}
