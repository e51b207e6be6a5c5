//! # Lifecycle
//!
//! Guards and transitions for a single proposal. Every function here works on
//! an in-memory [`Proposal`]; nothing is persisted until the caller in
//! `lib.rs` has completed the external transfer, so a rejected guard or a
//! failed transfer leaves storage untouched.
//!
//! | Transition                 | From                   | To                            |
//! |----------------------------|------------------------|-------------------------------|
//! | [`create`]                 | —                      | `Active`                      |
//! | [`invest`]                 | `Active` + accepting   | `Active`                      |
//! | [`execute`]                | `Active`, min reached  | `Executed`                    |
//! | [`distribute`]             | `Executed`, cooled     | `Executed`, profit declared   |
//! | [`advance_payout`]         | `Executed`, declared   | `Distributed` once all paid   |
//! | [`set_accepting`]          | `Active`               | `Active`                      |

use soroban_sdk::{Address, BytesN};

use crate::amount::{self, MAX_FUNDING_CAP};
use crate::types::{LifecycleState, Proposal, ProposalParams};
use crate::Error;

/// Check creation parameters. `contract` is the engine's own address, which
/// may not be used as a target.
pub fn validate(params: &ProposalParams, contract: &Address) -> Result<(), Error> {
    if params.id == 0 {
        return Err(Error::InvalidProposalId);
    }
    if params.min_amount <= 0
        || params.max_amount <= params.min_amount
        || params.max_amount > MAX_FUNDING_CAP
    {
        return Err(Error::InvalidFundingBand);
    }
    if !(1..=99).contains(&params.investor_share_percent) {
        return Err(Error::InvalidInvestorShare);
    }
    if &params.target == contract {
        return Err(Error::InvalidTarget);
    }
    Ok(())
}

/// Build a fresh `Active` proposal. Parameters must already be validated.
pub fn create(handle: BytesN<32>, params: ProposalParams, now: u64) -> Proposal {
    Proposal {
        handle,
        id: params.id,
        proposer: params.proposer,
        target: params.target,
        min_amount: params.min_amount,
        max_amount: params.max_amount,
        investor_share_percent: params.investor_share_percent,
        created_at: now,
        state: LifecycleState::Active,
        accepting_investment: true,
        current_amount: 0,
        executed_at: None,
        distributed_profit: None,
        payout_cursor: 0,
        paid_to_investors: 0,
    }
}

pub fn threshold_reached(proposal: &Proposal) -> bool {
    amount::reaches(proposal.current_amount, proposal.min_amount)
}

/// Apply a positive investment of `amount`. The whole amount is rejected if
/// it would push the total past the cap; there is no partial fill.
pub fn invest(proposal: &mut Proposal, amount: i128) -> Result<(), Error> {
    if proposal.state != LifecycleState::Active || !proposal.accepting_investment {
        return Err(Error::ProposalNotAcceptingInvestment);
    }

    let total = amount::add(proposal.current_amount, amount)?;
    if !amount::fits_under_cap(total, proposal.max_amount) {
        return Err(Error::FundingCapExceeded);
    }

    proposal.current_amount = total;
    Ok(())
}

/// Move to `Executed`. Returns the amount that must be sent to the target.
pub fn execute(proposal: &mut Proposal, caller: &Address, now: u64) -> Result<i128, Error> {
    if caller != &proposal.proposer {
        return Err(Error::Unauthorized);
    }
    if proposal.state != LifecycleState::Active {
        return Err(Error::InvalidState);
    }
    if !threshold_reached(proposal) {
        return Err(Error::ThresholdNotReached);
    }

    proposal.state = LifecycleState::Executed;
    proposal.executed_at = Some(now);
    proposal.accepting_investment = false;
    Ok(proposal.current_amount)
}

/// Timestamp at which distribution opens, once executed.
pub fn distribution_opens_at(proposal: &Proposal, cooldown_secs: u64) -> Option<u64> {
    proposal
        .executed_at
        .map(|at| at.saturating_add(cooldown_secs))
}

/// Seconds left before `distribute` is allowed; 0 if open or not executed.
pub fn cooldown_remaining(proposal: &Proposal, now: u64, cooldown_secs: u64) -> u64 {
    if proposal.state != LifecycleState::Executed {
        return 0;
    }
    distribution_opens_at(proposal, cooldown_secs)
        .map(|opens| opens.saturating_sub(now))
        .unwrap_or(0)
}

pub fn can_distribute(proposal: &Proposal, now: u64, cooldown_secs: u64) -> bool {
    proposal.state == LifecycleState::Executed
        && distribution_opens_at(proposal, cooldown_secs).map_or(false, |opens| now >= opens)
}

/// Start a distribution by declaring `profit_amount`, or check that a
/// follow-up batch declares the same profit as the first one.
pub fn distribute(
    proposal: &mut Proposal,
    caller: &Address,
    profit_amount: i128,
    now: u64,
    cooldown_secs: u64,
) -> Result<(), Error> {
    if caller != &proposal.proposer {
        return Err(Error::Unauthorized);
    }
    if proposal.state != LifecycleState::Executed {
        return Err(Error::InvalidState);
    }

    match proposal.distributed_profit {
        Some(declared) if declared != profit_amount => Err(Error::ProfitMismatch),
        Some(_) => Ok(()),
        None => {
            if !can_distribute(proposal, now, cooldown_secs) {
                return Err(Error::CooldownNotElapsed);
            }
            if profit_amount < 0 {
                return Err(Error::InvalidAmount);
            }
            proposal.distributed_profit = Some(profit_amount);
            Ok(())
        }
    }
}

/// Record a paid batch of `settled` investors totalling `paid`. Moves to
/// `Distributed` once all `investor_count` investors are settled and returns
/// whether it did.
pub fn advance_payout(
    proposal: &mut Proposal,
    settled: u32,
    paid: i128,
    investor_count: u32,
) -> Result<bool, Error> {
    if proposal.state != LifecycleState::Executed || proposal.distributed_profit.is_none() {
        return Err(Error::InvalidState);
    }

    proposal.payout_cursor = proposal
        .payout_cursor
        .checked_add(settled)
        .ok_or(Error::Overflow)?;
    proposal.paid_to_investors = amount::add(proposal.paid_to_investors, paid)?;

    if proposal.payout_cursor >= investor_count {
        proposal.state = LifecycleState::Distributed;
        return Ok(true);
    }
    Ok(false)
}

/// Open or close a proposal to new investment. Returns whether the flag
/// actually changed.
pub fn set_accepting(
    proposal: &mut Proposal,
    caller: &Address,
    accepting: bool,
    allow_reopen: bool,
) -> Result<bool, Error> {
    if caller != &proposal.proposer {
        return Err(Error::Unauthorized);
    }
    if proposal.state != LifecycleState::Active {
        return Err(Error::InvalidState);
    }
    if proposal.accepting_investment == accepting {
        return Ok(false);
    }
    if accepting && !allow_reopen {
        return Err(Error::ReopenNotAllowed);
    }

    proposal.accepting_investment = accepting;
    Ok(true)
}
