extern crate std;

use soroban_sdk::{
    symbol_short, testutils::Events, vec, Address, Env, IntoVal, Symbol, TryFromVal, TryIntoVal,
    Val, Vec,
};

use crate::events::{
    CrowdsaleClosed, CrowdsaleFinalized, ExcessSent, RaisedWithdrawn, RefundWithdrawn,
    RefundsEnabled, RewardWithdrawn, RewardsEnabled, SaleInitialized, TokensClaimed,
    TokensPurchased, TokensRepurchased,
};
use crate::test::{uninitialized, Sale, GOAL, RATE, REWARDS_PERCENT};
use crate::SaleState;

/// Most recent event published by `contract` whose first topic is `name`.
fn last_event(env: &Env, contract: &Address, name: Symbol) -> (Vec<Val>, Val) {
    let all = env.events().all();
    let mut i = all.len();
    while i > 0 {
        i -= 1;
        let (source, topics, data) = all.get_unchecked(i);
        if source != *contract {
            continue;
        }
        let first = topics
            .get(0)
            .and_then(|topic| Symbol::try_from_val(env, &topic).ok());
        if first == Some(name.clone()) {
            return (topics, data);
        }
    }
    panic!("no {:?} event published", name);
}

#[test]
fn test_sale_initialized_event() {
    let (env, client, owner, config) = uninitialized(GOAL, RATE, REWARDS_PERCENT);
    client.init(&owner, &config);
    let env = &env;

    let (topics, data) = last_event(env, &client.address, symbol_short!("init"));
    assert_eq!(topics, vec![env, symbol_short!("init").into_val(env)]);

    let event: SaleInitialized = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        SaleInitialized {
            owner: owner.clone(),
            wallet: config.wallet.clone(),
            token: config.token.clone(),
            accepted_token: config.accepted_token.clone(),
            goal: GOAL,
        }
    );

    let (topics, data) = last_event(env, &client.address, symbol_short!("owner_set"));
    assert_eq!(
        topics,
        vec![
            env,
            symbol_short!("owner_set").into_val(env),
            owner.into_val(env)
        ]
    );
    let previous: Option<Address> = data.try_into_val(env).unwrap();
    assert_eq!(previous, None);
}

#[test]
fn test_tokens_purchased_event() {
    let sale = Sale::new();
    sale.open();
    let investor = sale.whitelisted();
    let purchaser = sale.account();
    sale.buy(&purchaser, &investor, 42);

    let env = &sale.env;
    let (topics, data) = last_event(env, &sale.client.address, symbol_short!("purchased"));
    assert_eq!(
        topics,
        vec![
            env,
            symbol_short!("purchased").into_val(env),
            investor.into_val(env)
        ]
    );

    let event: TokensPurchased = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        TokensPurchased {
            purchaser,
            beneficiary: investor,
            value: 42,
            amount: 42,
        }
    );
}

#[test]
fn test_excess_sent_event() {
    let sale = Sale::new();
    sale.open();
    let investor = sale.whitelisted();
    let purchaser = sale.account();
    let amount = (GOAL + 5) * RATE;
    sale.buy(&purchaser, &investor, amount);

    let env = &sale.env;
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("excess"));
    let event: ExcessSent = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        ExcessSent {
            beneficiary: investor.clone(),
            value: 5,
        }
    );

    // The purchase reports only the collected value.
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("purchased"));
    let event: TokensPurchased = data.try_into_val(env).unwrap();
    assert_eq!(event.value, GOAL);
    assert_eq!(event.amount, amount);
}

#[test]
fn test_no_excess_event_below_goal() {
    let sale = Sale::new();
    sale.open();
    let investor = sale.whitelisted();
    sale.buy(&investor, &investor, 42);

    let env = &sale.env;
    let all = env.events().all();
    for (source, topics, _) in all.iter() {
        if source != sale.client.address {
            continue;
        }
        let first = topics
            .get(0)
            .and_then(|topic| Symbol::try_from_val(env, &topic).ok());
        assert_ne!(first, Some(symbol_short!("excess")));
    }
}

#[test]
fn test_tokens_repurchased_event() {
    let sale = Sale::new();
    sale.open();
    let investor = sale.whitelisted();
    let repurchaser = sale.whitelisted();
    let purchaser = sale.account();
    sale.buy(&investor, &investor, 100_000);
    let price = sale.repurchase(&purchaser, &repurchaser);

    let env = &sale.env;
    let (topics, data) = last_event(env, &sale.client.address, symbol_short!("repurch"));
    assert_eq!(
        topics,
        vec![
            env,
            symbol_short!("repurch").into_val(env),
            repurchaser.into_val(env)
        ]
    );
    let event: TokensRepurchased = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        TokensRepurchased {
            purchaser,
            beneficiary: repurchaser,
            value: price,
            amount: GOAL * RATE,
        }
    );
}

#[test]
fn test_refunding_finalization_events() {
    let sale = Sale::new();
    sale.open();
    let investor = sale.whitelisted();
    sale.buy(&investor, &investor, 1_000);
    sale.close();
    sale.client.finalize();

    let env = &sale.env;
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("refunds"));
    let event: RefundsEnabled = data.try_into_val(env).unwrap();
    assert_eq!(event, RefundsEnabled { raised: 1_000 });

    // The finalization summary comes last.
    let all = env.events().all();
    let (source, topics, data) = all.last().unwrap();
    assert_eq!(source, sale.client.address);
    assert_eq!(topics, vec![env, symbol_short!("finalized").into_val(env)]);
    let event: CrowdsaleFinalized = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        CrowdsaleFinalized {
            state: SaleState::Refunding,
            raised: 1_000,
        }
    );
}

#[test]
fn test_closed_finalization_events() {
    let sale = Sale::new();
    sale.open();
    let investor = sale.whitelisted();
    sale.buy(&investor, &investor, GOAL * RATE);
    sale.client.finalize();

    let env = &sale.env;
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("closed"));
    let event: CrowdsaleClosed = data.try_into_val(env).unwrap();
    assert_eq!(event, CrowdsaleClosed { raised: GOAL });

    let (_, data) = last_event(env, &sale.client.address, symbol_short!("finalized"));
    let event: CrowdsaleFinalized = data.try_into_val(env).unwrap();
    assert_eq!(event.state, SaleState::Closed);
}

#[test]
fn test_rewarding_finalization_events() {
    let sale = Sale::new();
    sale.open();
    let repurchaser = sale.whitelisted();
    sale.repurchase(&repurchaser, &repurchaser);
    sale.client.finalize();

    let env = &sale.env;
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("rewards"));
    let event: RewardsEnabled = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        RewardsEnabled {
            repurchaser: Some(repurchaser),
        }
    );

    let (_, data) = last_event(env, &sale.client.address, symbol_short!("finalized"));
    let event: CrowdsaleFinalized = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        CrowdsaleFinalized {
            state: SaleState::Rewarding,
            raised: GOAL,
        }
    );
}

#[test]
fn test_refund_withdrawn_event() {
    let sale = Sale::new();
    sale.open();
    let investor = sale.whitelisted();
    sale.buy(&investor, &investor, 1_000);
    sale.close();
    sale.client.finalize();
    sale.client.claim_refund(&investor);

    let env = &sale.env;
    let (topics, data) = last_event(env, &sale.client.address, symbol_short!("refunded"));
    assert_eq!(
        topics,
        vec![
            env,
            symbol_short!("refunded").into_val(env),
            investor.into_val(env)
        ]
    );
    let event: RefundWithdrawn = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        RefundWithdrawn {
            refundee: investor,
            amount: 1_000,
        }
    );
}

#[test]
fn test_tokens_claimed_and_raised_withdrawn_events() {
    let sale = Sale::new();
    sale.open();
    let investor = sale.whitelisted();
    sale.buy(&investor, &investor, GOAL * RATE);
    sale.client.finalize();

    sale.client.claim_tokens(&investor);
    let env = &sale.env;
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("claimed"));
    let event: TokensClaimed = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        TokensClaimed {
            beneficiary: investor,
            amount: GOAL * RATE,
        }
    );

    sale.client.withdraw(&sale.owner);
    let (topics, data) = last_event(env, &sale.client.address, symbol_short!("withdrawn"));
    assert_eq!(
        topics,
        vec![
            env,
            symbol_short!("withdrawn").into_val(env),
            sale.wallet.into_val(env)
        ]
    );
    let event: RaisedWithdrawn = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        RaisedWithdrawn {
            wallet: sale.wallet.clone(),
            amount: GOAL,
        }
    );
}

#[test]
fn test_reward_withdrawn_event() {
    let sale = Sale::new();
    sale.open();
    let investor = sale.whitelisted();
    let repurchaser = sale.whitelisted();
    sale.buy(&investor, &investor, 100_000);
    sale.repurchase(&repurchaser, &repurchaser);
    sale.client.finalize();

    sale.client.claim_reward(&investor);
    let env = &sale.env;
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("rewarded"));
    let event: RewardWithdrawn = data.try_into_val(env).unwrap();
    assert_eq!(
        event,
        RewardWithdrawn {
            rewardee: investor,
            amount: 110_000,
        }
    );

    sale.client.claim_repurchased_tokens();
    let (topics, data) = last_event(env, &sale.client.address, symbol_short!("claimed"));
    assert_eq!(
        topics,
        vec![
            env,
            symbol_short!("claimed").into_val(env),
            repurchaser.into_val(env)
        ]
    );
    let event: TokensClaimed = data.try_into_val(env).unwrap();
    assert_eq!(event.amount, GOAL * RATE);
}

#[test]
fn test_role_and_whitelist_events() {
    let sale = Sale::new();
    let env = &sale.env;
    let admin = sale.account();
    let account = sale.account();

    sale.client.change_admin(&sale.owner, &admin);
    let (topics, data) = last_event(env, &sale.client.address, symbol_short!("admin_set"));
    assert_eq!(
        topics,
        vec![
            env,
            symbol_short!("admin_set").into_val(env),
            admin.into_val(env)
        ]
    );
    let previous: Option<Address> = data.try_into_val(env).unwrap();
    assert_eq!(previous, Some(sale.owner.clone()));

    sale.client.add_to_whitelist(&admin, &account);
    let (topics, data) = last_event(env, &sale.client.address, symbol_short!("wl_add"));
    assert_eq!(
        topics,
        vec![
            env,
            symbol_short!("wl_add").into_val(env),
            account.into_val(env)
        ]
    );
    let by: Option<Address> = data.try_into_val(env).unwrap();
    assert_eq!(by, Some(admin.clone()));

    sale.client.remove_from_whitelist(&sale.owner, &account);
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("wl_del"));
    let by: Option<Address> = data.try_into_val(env).unwrap();
    assert_eq!(by, Some(sale.owner.clone()));
}

#[test]
fn test_pause_events() {
    let sale = Sale::new();
    let env = &sale.env;

    sale.client.pause(&sale.owner);
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("paused"));
    let by: Address = data.try_into_val(env).unwrap();
    assert_eq!(by, sale.owner);

    sale.client.unpause(&sale.owner);
    let (_, data) = last_event(env, &sale.client.address, symbol_short!("unpaused"));
    let by: Address = data.try_into_val(env).unwrap();
    assert_eq!(by, sale.owner);
}
