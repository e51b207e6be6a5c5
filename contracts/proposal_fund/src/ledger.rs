//! # Investment ledger
//!
//! Per-proposal bookkeeping of who invested how much, in first-contribution
//! order, and what each investor was paid at distribution. Distribution walks
//! investors in that same order, a bounded batch at a time.
//!
//! The ledger never decides whether a contribution is allowed; that is the
//! lifecycle's job. It only keeps `sum(contributions) == current_amount`.

use soroban_sdk::{Address, BytesN, Env, Vec};

use crate::amount;
use crate::storage::{get_persistent, set_persistent, DataKey};
use crate::types::Proposal;
use crate::Error;

/// Most investors settled by a single `distribute` call. Each one costs a
/// token transfer plus a handful of ledger entries.
pub const MAX_PAYOUT_BATCH: u32 = 20;

/// Payments for one contiguous run of investors, in investor order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayoutBatch {
    pub payments: Vec<(Address, i128)>,
    /// Sum of `payments`.
    pub paid: i128,
}

/// Add `amount` to `investor`'s contribution and return the new total of the
/// investor's entry.
pub fn record_contribution(
    env: &Env,
    handle: &BytesN<32>,
    investor: &Address,
    amount: i128,
) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let key = DataKey::Contribution(handle.clone(), investor.clone());
    let existing: Option<i128> = get_persistent(env, &key);

    let updated = match existing {
        Some(prev) => amount::add(prev, amount)?,
        None => {
            let index = total_investors(env, handle);
            let next = index.checked_add(1).ok_or(Error::Overflow)?;
            set_persistent(env, &DataKey::InvestorAt(handle.clone(), index), investor);
            set_persistent(env, &DataKey::InvestorCount(handle.clone()), &next);
            amount
        }
    };

    set_persistent(env, &key, &updated);
    Ok(updated)
}

pub fn contribution_of(env: &Env, handle: &BytesN<32>, investor: &Address) -> i128 {
    get_persistent(env, &DataKey::Contribution(handle.clone(), investor.clone())).unwrap_or(0)
}

pub fn total_investors(env: &Env, handle: &BytesN<32>) -> u32 {
    get_persistent(env, &DataKey::InvestorCount(handle.clone())).unwrap_or(0)
}

/// Every investor, ordered by first contribution.
pub fn all_investors(env: &Env, handle: &BytesN<32>) -> Result<Vec<Address>, Error> {
    let count = total_investors(env, handle);
    let mut investors = Vec::new(env);
    for index in 0..count {
        let investor: Address = get_persistent(env, &DataKey::InvestorAt(handle.clone(), index))
            .ok_or(Error::ProposalNotFound)?;
        investors.push_back(investor);
    }
    Ok(investors)
}

/// `floor(floor(total_profit * percent / 100) * contribution / aggregate)`.
pub fn share_of(
    env: &Env,
    handle: &BytesN<32>,
    investor: &Address,
    total_profit: i128,
    investor_share_percent: u32,
    aggregate: i128,
) -> Result<i128, Error> {
    let pool = amount::percent_of(total_profit, investor_share_percent)?;
    amount::pro_rata(pool, contribution_of(env, handle, investor), aggregate)
}

/// Compute the payments for the next `limit` unpaid investors of a proposal
/// whose profit has been declared, starting at its payout cursor.
///
/// The running total can never exceed the investor pool, so shares plus the
/// proposer remainder always equal the declared profit exactly.
pub fn payout_batch(env: &Env, proposal: &Proposal, limit: u32) -> Result<PayoutBatch, Error> {
    let profit = proposal.distributed_profit.ok_or(Error::InvalidState)?;
    let pool = amount::percent_of(profit, proposal.investor_share_percent)?;
    let start = proposal.payout_cursor;
    let end = start
        .saturating_add(limit)
        .min(total_investors(env, &proposal.handle));

    let mut payments = Vec::new(env);
    let mut paid: i128 = 0;
    for index in start..end {
        let investor: Address =
            get_persistent(env, &DataKey::InvestorAt(proposal.handle.clone(), index))
                .ok_or(Error::ProposalNotFound)?;
        let contribution = contribution_of(env, &proposal.handle, &investor);
        let share = amount::pro_rata(pool, contribution, proposal.current_amount)?;
        paid = amount::add(paid, share)?;
        payments.push_back((investor, share));
    }

    // Floor rounding guarantees this; a violation means corrupted contributions.
    if amount::add(proposal.paid_to_investors, paid)? > pool {
        return Err(Error::Overflow);
    }

    Ok(PayoutBatch { payments, paid })
}

pub fn record_payout(env: &Env, handle: &BytesN<32>, investor: &Address, paid: i128) {
    set_persistent(env, &DataKey::Payout(handle.clone(), investor.clone()), &paid);
}

pub fn payout_of(env: &Env, handle: &BytesN<32>, investor: &Address) -> i128 {
    get_persistent(env, &DataKey::Payout(handle.clone(), investor.clone())).unwrap_or(0)
}
