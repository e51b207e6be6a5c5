//! # Registry
//!
//! Creates proposals and indexes them three ways: by generated handle, by
//! caller-assigned id and by creation sequence. The registry is append-only;
//! ids are never reused and proposals are never removed, so creation order is
//! total and stable.

use soroban_sdk::{Bytes, BytesN, Env, Vec};

use crate::lifecycle;
use crate::storage;
use crate::types::{Proposal, ProposalParams};
use crate::Error;

/// Largest page returned by [`list`].
pub const MAX_PAGE_SIZE: u32 = 50;

/// Handle = sha256(sequence ‖ id). Unique because the sequence is.
fn derive_handle(env: &Env, seq: u64, id: u64) -> BytesN<32> {
    let mut preimage = Bytes::new(env);
    preimage.extend_from_array(&seq.to_be_bytes());
    preimage.extend_from_array(&id.to_be_bytes());
    env.crypto().sha256(&preimage).to_bytes()
}

pub fn create(env: &Env, params: ProposalParams) -> Result<Proposal, Error> {
    lifecycle::validate(&params, &env.current_contract_address())?;
    if storage::id_taken(env, params.id) {
        return Err(Error::DuplicateProposalId);
    }

    let seq = storage::next_sequence(env)?;
    let handle = derive_handle(env, seq, params.id);
    let proposal = lifecycle::create(handle, params, env.ledger().timestamp());
    storage::save_new_proposal(env, seq, &proposal);
    Ok(proposal)
}

pub fn get(env: &Env, handle: &BytesN<32>) -> Result<Proposal, Error> {
    storage::load_proposal(env, handle)
}

pub fn get_by_id(env: &Env, id: u64) -> Result<Proposal, Error> {
    let handle = storage::handle_by_id(env, id)?;
    storage::load_proposal(env, &handle)
}

/// Proposals `start..start + limit` in creation order. Calling again with
/// `start + returned.len()` resumes where the previous page ended.
pub fn list(env: &Env, start: u64, limit: u32) -> Result<Vec<Proposal>, Error> {
    let count = storage::proposal_count(env);
    let end = start
        .saturating_add(limit.min(MAX_PAGE_SIZE) as u64)
        .min(count);

    let mut page = Vec::new(env);
    for seq in start..end {
        let handle = storage::handle_at(env, seq)?;
        page.push_back(storage::load_proposal(env, &handle)?);
    }
    Ok(page)
}
