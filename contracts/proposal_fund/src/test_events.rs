extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, TryIntoVal,
};

use crate::events::{Invested, ProfitDistributed, ProfitPaid, ProposalCreated, ProposalExecuted};
use crate::ledger::MAX_PAYOUT_BATCH;
use crate::{ProposalFund, ProposalFundClient, ProposalParams};

const COOLDOWN: u64 = 600;
const BATCH: u32 = MAX_PAYOUT_BATCH;

fn setup() -> (Env, ProposalFundClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ProposalFund, ());
    let client = ProposalFundClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    client.init(&admin, &token, &COOLDOWN, &false);
    (env, client, admin, token)
}

fn create(env: &Env, client: &ProposalFundClient) -> ProposalParams {
    let params = ProposalParams {
        id: 11,
        proposer: Address::generate(env),
        target: Address::generate(env),
        min_amount: 100,
        max_amount: 1_000,
        investor_share_percent: 40,
    };
    client.create_proposal(&params);
    params
}

#[test]
fn test_proposal_created_event() {
    let (env, client, _admin, _token) = setup();
    let params = create(&env, &client);
    let handle = client.get_proposal(&11).proposal.handle;

    let last_event = env.events().all().last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        11u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let data: ProposalCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        data,
        ProposalCreated {
            proposal_id: 11,
            handle,
            proposer: params.proposer,
            target: params.target,
            min_amount: 100,
            max_amount: 1_000,
        }
    );
}

#[test]
fn test_invested_event() {
    let (env, client, _admin, token) = setup();
    create(&env, &client);

    let investor = Address::generate(&env);
    token::StellarAssetClient::new(&env, &token).mint(&investor, &250);
    client.invest(&11, &investor, &250);

    let last_event = env.events().all().last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("invested").into_val(&env),
        11u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let data: Invested = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        data,
        Invested {
            proposal_id: 11,
            investor,
            amount: 250,
            current_amount: 250,
        }
    );
}

#[test]
fn test_executed_and_distributed_events() {
    let (env, client, _admin, token) = setup();
    let params = create(&env, &client);

    let investor = Address::generate(&env);
    let sac = token::StellarAssetClient::new(&env, &token);
    sac.mint(&investor, &500);
    client.invest(&11, &investor, &500);

    env.ledger().set_timestamp(77);
    client.execute(&11, &params.proposer);

    let last_event = env.events().all().last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("executed").into_val(&env),
        11u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let data: ProposalExecuted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        data,
        ProposalExecuted {
            proposal_id: 11,
            target: params.target.clone(),
            amount: 500,
            executed_at: 77,
        }
    );

    env.ledger().set_timestamp(77 + COOLDOWN);
    sac.mint(&params.proposer, &1_000);
    client.distribute(&11, &params.proposer, &1_000, &BATCH);

    let all = env.events().all();
    let last_event = all.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("distrib").into_val(&env),
        11u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let data: ProfitDistributed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        data,
        ProfitDistributed {
            proposal_id: 11,
            profit_amount: 1_000,
            paid_to_investors: 400,
            proposer_remainder: 600,
        }
    );

    let paid = all
        .iter()
        .filter_map(|(_, topics, data)| {
            let topic: soroban_sdk::Symbol = topics.get(0)?.try_into_val(&env).ok()?;
            if topic == symbol_short!("paid") {
                let payload: ProfitPaid = data.try_into_val(&env).ok()?;
                Some(payload)
            } else {
                None
            }
        })
        .last()
        .expect("No payout event");
    assert_eq!(
        paid,
        ProfitPaid {
            proposal_id: 11,
            investor,
            amount: 400,
        }
    );
}

#[test]
fn test_distributed_event_only_on_last_batch() {
    let (env, client, _admin, token) = setup();
    let params = create(&env, &client);

    let sac = token::StellarAssetClient::new(&env, &token);
    for amount in [100i128, 100] {
        let investor = Address::generate(&env);
        sac.mint(&investor, &amount);
        client.invest(&11, &investor, &amount);
    }
    client.execute(&11, &params.proposer);
    env.ledger().set_timestamp(COOLDOWN);
    sac.mint(&params.proposer, &1_000);

    client.distribute(&11, &params.proposer, &1_000, &1);
    let distrib_seen = env.events().all().iter().any(|(_, topics, _)| {
        topics
            .get(0)
            .and_then(|t| t.try_into_val(&env).ok())
            .map_or(false, |t: soroban_sdk::Symbol| t == symbol_short!("distrib"))
    });
    assert!(!distrib_seen);

    client.distribute(&11, &params.proposer, &1_000, &1);
    let last_event = env.events().all().last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("distrib").into_val(&env),
        11u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let data: ProfitDistributed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(data.paid_to_investors, 400);
    assert_eq!(data.proposer_remainder, 600);
}

#[test]
fn test_pause_events() {
    let (env, client, admin, _token) = setup();

    client.pause(&admin);
    let last_event = env.events().all().last().expect("No events found");
    let expected_topics = vec![&env, symbol_short!("paused").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);
    let by: Address = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(by, admin);

    client.unpause(&admin);
    let last_event = env.events().all().last().expect("No events found");
    let expected_topics = vec![&env, symbol_short!("unpaused").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);
}
