use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalCreated {
    pub proposal_id: u64,
    pub handle: BytesN<32>,
    pub proposer: Address,
    pub target: Address,
    pub min_amount: i128,
    pub max_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invested {
    pub proposal_id: u64,
    pub investor: Address,
    pub amount: i128,
    pub current_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalExecuted {
    pub proposal_id: u64,
    pub target: Address,
    pub amount: i128,
    pub executed_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProfitPaid {
    pub proposal_id: u64,
    pub investor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProfitDistributed {
    pub proposal_id: u64,
    pub profit_amount: i128,
    pub paid_to_investors: i128,
    pub proposer_remainder: i128,
}

pub fn emit_proposal_created(
    env: &Env,
    proposal_id: u64,
    handle: BytesN<32>,
    proposer: Address,
    target: Address,
    min_amount: i128,
    max_amount: i128,
) {
    let topics = (symbol_short!("created"), proposal_id);
    let data = ProposalCreated {
        proposal_id,
        handle,
        proposer,
        target,
        min_amount,
        max_amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_invested(
    env: &Env,
    proposal_id: u64,
    investor: Address,
    amount: i128,
    current_amount: i128,
) {
    let topics = (symbol_short!("invested"), proposal_id);
    let data = Invested {
        proposal_id,
        investor,
        amount,
        current_amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_executed(env: &Env, proposal_id: u64, target: Address, amount: i128, executed_at: u64) {
    let topics = (symbol_short!("executed"), proposal_id);
    let data = ProposalExecuted {
        proposal_id,
        target,
        amount,
        executed_at,
    };
    env.events().publish(topics, data);
}

pub fn emit_profit_paid(env: &Env, proposal_id: u64, investor: Address, amount: i128) {
    let topics = (symbol_short!("paid"), proposal_id);
    let data = ProfitPaid {
        proposal_id,
        investor,
        amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_distributed(
    env: &Env,
    proposal_id: u64,
    profit_amount: i128,
    paid_to_investors: i128,
    proposer_remainder: i128,
) {
    let topics = (symbol_short!("distrib"), proposal_id);
    let data = ProfitDistributed {
        proposal_id,
        profit_amount,
        paid_to_investors,
        proposer_remainder,
    };
    env.events().publish(topics, data);
}

pub fn emit_accepting_changed(env: &Env, proposal_id: u64, accepting: bool) {
    env.events()
        .publish((symbol_short!("accept"), proposal_id), accepting);
}

pub fn emit_protocol_paused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("paused"),), by);
}

pub fn emit_protocol_unpaused(env: &Env, by: Address) {
    env.events().publish((symbol_short!("unpaused"),), by);
}
