//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the engine.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key             | Type             | Description                          |
//! |-----------------|------------------|--------------------------------------|
//! | `Config`        | `PlatformConfig` | Token, cooldown, reopen policy       |
//! | `Stats`         | `PlatformStats`  | Dashboard counters                   |
//! | `Paused`        | `bool`           | Emergency stop                       |
//! | `ProposalCount` | `u64`            | Creation sequence                    |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                               | Type             | Description                     |
//! |-----------------------------------|------------------|---------------------------------|
//! | `ProposalAt(seq)`                 | `BytesN<32>`     | Handle by creation sequence     |
//! | `ProposalId(id)`                  | `BytesN<32>`     | Handle by caller-assigned id    |
//! | `PropConfig(handle)`              | `ProposalConfig` | Immutable configuration         |
//! | `PropState(handle)`               | `ProposalState`  | Mutable lifecycle state         |
//! | `Contribution(handle, addr)`      | `i128`           | Investor contribution           |
//! | `InvestorCount(handle)`           | `u32`            | Distinct investors              |
//! | `InvestorAt(handle, idx)`         | `Address`        | First-contribution order        |
//! | `Payout(handle, addr)`            | `i128`           | Profit paid to an investor      |
//! | `RequestKey(handle, addr, key)`   | `i128`           | Amount applied under a key      |
//!
//! RBAC entries (see [`crate::rbac`]) live in the same tier and go through
//! the same TTL helpers.
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, BytesN, Env, IntoVal, TryFromVal, Val};

use crate::types::{PlatformConfig, PlatformStats, Proposal, ProposalConfig, ProposalState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Stats,
    Paused,
    ProposalCount,
    ProposalAt(u64),
    ProposalId(u64),
    PropConfig(BytesN<32>),
    PropState(BytesN<32>),
    Contribution(BytesN<32>, Address),
    InvestorCount(BytesN<32>),
    InvestorAt(BytesN<32>, u32),
    Payout(BytesN<32>, Address),
    RequestKey(BytesN<32>, Address, BytesN<32>),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn load_config(env: &Env) -> Result<PlatformConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn save_config(env: &Env, config: &PlatformConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_stats(env: &Env) -> PlatformStats {
    env.storage()
        .instance()
        .get(&DataKey::Stats)
        .unwrap_or_default()
}

pub fn save_stats(env: &Env, stats: &PlatformStats) {
    env.storage().instance().set(&DataKey::Stats, stats);
    bump_instance(env);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
    bump_instance(env);
}

pub fn proposal_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProposalCount)
        .unwrap_or(0)
}

/// Read and increment the creation sequence.
/// Returns the sequence number the new proposal should use.
pub fn next_sequence(env: &Env) -> Result<u64, Error> {
    let current = proposal_count(env);
    let next = current.checked_add(1).ok_or(Error::Overflow)?;
    env.storage()
        .instance()
        .set(&DataKey::ProposalCount, &next);
    bump_instance(env);
    Ok(current)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

pub(crate) fn bump_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub(crate) fn get_persistent<K, V>(env: &Env, key: &K) -> Option<V>
where
    K: IntoVal<Env, Val>,
    V: TryFromVal<Env, Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

pub(crate) fn set_persistent<K, V>(env: &Env, key: &K, value: &V)
where
    K: IntoVal<Env, Val>,
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

pub(crate) fn remove_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage().persistent().remove(key);
}

/// Write a freshly created proposal and both of its indexes.
pub fn save_new_proposal(env: &Env, seq: u64, proposal: &Proposal) {
    set_persistent(env, &DataKey::ProposalAt(seq), &proposal.handle);
    set_persistent(env, &DataKey::ProposalId(proposal.id), &proposal.handle);
    set_persistent(
        env,
        &DataKey::PropConfig(proposal.handle.clone()),
        &proposal.config(),
    );
    save_proposal_state(env, &proposal.handle, &proposal.state());
}

pub fn id_taken(env: &Env, id: u64) -> bool {
    env.storage().persistent().has(&DataKey::ProposalId(id))
}

pub fn handle_by_id(env: &Env, id: u64) -> Result<BytesN<32>, Error> {
    get_persistent(env, &DataKey::ProposalId(id)).ok_or(Error::ProposalNotFound)
}

pub fn handle_at(env: &Env, seq: u64) -> Result<BytesN<32>, Error> {
    get_persistent(env, &DataKey::ProposalAt(seq)).ok_or(Error::ProposalNotFound)
}

pub fn load_proposal_config(env: &Env, handle: &BytesN<32>) -> Result<ProposalConfig, Error> {
    get_persistent(env, &DataKey::PropConfig(handle.clone())).ok_or(Error::ProposalNotFound)
}

pub fn load_proposal_state(env: &Env, handle: &BytesN<32>) -> Result<ProposalState, Error> {
    get_persistent(env, &DataKey::PropState(handle.clone())).ok_or(Error::ProposalNotFound)
}

/// Load the full proposal by combining config and state.
pub fn load_proposal(env: &Env, handle: &BytesN<32>) -> Result<Proposal, Error> {
    let config = load_proposal_config(env, handle)?;
    let state = load_proposal_state(env, handle)?;
    Ok(Proposal::from_parts(config, state))
}

/// Save only the mutable state; the config never changes after creation.
pub fn save_proposal_state(env: &Env, handle: &BytesN<32>, state: &ProposalState) {
    set_persistent(env, &DataKey::PropState(handle.clone()), state);
}

/// Amount an earlier `invest_with_key` from `investor` applied under `key`.
pub fn applied_request(
    env: &Env,
    handle: &BytesN<32>,
    investor: &Address,
    key: &BytesN<32>,
) -> Option<i128> {
    get_persistent(
        env,
        &DataKey::RequestKey(handle.clone(), investor.clone(), key.clone()),
    )
}

pub fn record_request(
    env: &Env,
    handle: &BytesN<32>,
    investor: &Address,
    key: &BytesN<32>,
    amount: i128,
) {
    set_persistent(
        env,
        &DataKey::RequestKey(handle.clone(), investor.clone(), key.clone()),
        &amount,
    );
}
