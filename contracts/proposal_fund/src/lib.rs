//! # Proposal Fund Contract
//!
//! A crowdfunding engine for governance proposals. A proposer registers a
//! campaign with a target address, a minimum/maximum funding band and an
//! investor profit share; investors contribute; once the minimum is reached
//! the proposer executes the proposal, sending the funds to the target; after
//! a cooldown the proposer distributes profit back to investors pro-rata.
//!
//! | Phase        | Entry Point(s)                                              |
//! |--------------|-------------------------------------------------------------|
//! | Bootstrap    | [`ProposalFund::init`]                                      |
//! | Admin        | `grant_admin`, `revoke_admin`, `transfer_super_admin`, `pause`, `unpause`, `set_allow_reopen` |
//! | Registration | [`ProposalFund::create_proposal`]                           |
//! | Funding      | [`ProposalFund::invest`], [`ProposalFund::invest_with_key`], `set_accepting_investment` |
//! | Execution    | [`ProposalFund::execute`]                                   |
//! | Distribution | [`ProposalFund::distribute`] (batched)                      |
//! | Queries      | `get_proposal`, `list_proposals`, `get_investment_of`, `dashboard_stats`, … |
//!
//! ## Architecture
//!
//! Arithmetic lives in [`amount`], per-investor bookkeeping in [`ledger`],
//! transition guards in [`lifecycle`], creation and indexing in [`registry`]
//! and derived read fields in [`projection`]. This file wires them to storage
//! and to the settlement token. Every command checks all guards and performs
//! its token transfers before any state is written, and returns the updated
//! [`ProposalSnapshot`].

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, log, token, Address, BytesN, Env, Vec,
};

pub mod amount;
pub mod events;
pub mod ledger;
pub mod lifecycle;
pub mod projection;
pub mod rbac;
pub mod registry;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use rbac::Role;
pub use types::{
    DashboardStats, DistributionReceipt, LifecycleState, PlatformConfig, Proposal,
    ProposalParams, ProposalSnapshot, StatusLabel,
};

/// Longest cooldown accepted at `init`: 5 years.
pub const MAX_COOLDOWN_SECS: u64 = 157_680_000;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    ProtocolPaused = 3,
    InvalidProposalId = 4,
    InvalidFundingBand = 5,
    InvalidInvestorShare = 6,
    InvalidTarget = 7,
    InvalidCooldown = 8,
    DuplicateProposalId = 9,
    ProposalNotFound = 10,
    Unauthorized = 11,
    InvalidState = 12,
    ProposalNotAcceptingInvestment = 13,
    FundingCapExceeded = 14,
    ThresholdNotReached = 15,
    CooldownNotElapsed = 16,
    InvalidAmount = 17,
    Overflow = 18,
    TransferFailed = 19,
    ReopenNotAllowed = 20,
    InvalidBatchSize = 21,
    ProfitMismatch = 22,
}

#[contract]
pub struct ProposalFund;

#[contractimpl]
impl ProposalFund {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the platform.
    ///
    /// - `super_admin` is granted the `SuperAdmin` role and must sign.
    /// - `token` is the asset every investment and payout is made in.
    /// - `cooldown_secs` applies to every proposal, between execution and
    ///   distribution.
    /// - `allow_reopen` decides whether a proposer may reopen a proposal they
    ///   closed to investment.
    pub fn init(
        env: Env,
        super_admin: Address,
        token: Address,
        cooldown_secs: u64,
        allow_reopen: bool,
    ) -> Result<(), Error> {
        super_admin.require_auth();
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if cooldown_secs > MAX_COOLDOWN_SECS {
            return Err(Error::InvalidCooldown);
        }

        rbac::init_super_admin(&env, &super_admin)?;
        storage::save_config(
            &env,
            &PlatformConfig {
                token,
                cooldown_secs,
                allow_reopen,
            },
        );
        storage::save_stats(&env, &types::PlatformStats::default());
        Ok(())
    }

    pub fn config(env: Env) -> Result<PlatformConfig, Error> {
        storage::load_config(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Administration
    // ─────────────────────────────────────────────────────────

    pub fn grant_admin(env: Env, caller: Address, target: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::grant_admin(&env, &caller, &target)
    }

    pub fn revoke_admin(env: Env, caller: Address, target: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::revoke_admin(&env, &caller, &target)
    }

    pub fn transfer_super_admin(
        env: Env,
        current_super_admin: Address,
        new_super_admin: Address,
    ) -> Result<(), Error> {
        current_super_admin.require_auth();
        rbac::transfer_super_admin(&env, &current_super_admin, &new_super_admin)
    }

    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        rbac::get_role(&env, &address)
    }

    pub fn is_admin(env: Env, address: Address) -> bool {
        rbac::is_admin(&env, &address)
    }

    /// Change whether closed proposals may be reopened to investment.
    pub fn set_allow_reopen(env: Env, caller: Address, allow: bool) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_admin_or_above(&env, &caller)?;
        let mut config = storage::load_config(&env)?;
        config.allow_reopen = allow;
        storage::save_config(&env, &config);
        Ok(())
    }

    /// Halt every command. Reads keep working.
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_admin_or_above(&env, &caller)?;
        storage::set_paused(&env, true);
        events::emit_protocol_paused(&env, caller);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_admin_or_above(&env, &caller)?;
        storage::set_paused(&env, false);
        events::emit_protocol_unpaused(&env, caller);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Proposal lifecycle
    // ─────────────────────────────────────────────────────────

    /// Register a new proposal. `params.proposer` must sign.
    ///
    /// Fails with a validation error for a zero id, a bad funding band, a
    /// share outside 1–99 or a target equal to this contract, and with
    /// `DuplicateProposalId` if the id was ever used before.
    pub fn create_proposal(env: Env, params: ProposalParams) -> Result<ProposalSnapshot, Error> {
        Self::require_not_paused(&env)?;
        let config = storage::load_config(&env)?;
        params.proposer.require_auth();

        let proposal = registry::create(&env, params)?;

        let mut stats = storage::load_stats(&env);
        stats.total_proposals = stats.total_proposals.saturating_add(1);
        storage::save_stats(&env, &stats);

        events::emit_proposal_created(
            &env,
            proposal.id,
            proposal.handle.clone(),
            proposal.proposer.clone(),
            proposal.target.clone(),
            proposal.min_amount,
            proposal.max_amount,
        );

        Ok(Self::snapshot_of(&env, proposal, &config))
    }

    /// Invest `amount` of the platform token into a proposal.
    ///
    /// Rejected as a whole if it would push the total above `max_amount`.
    pub fn invest(
        env: Env,
        proposal_id: u64,
        investor: Address,
        amount: i128,
    ) -> Result<ProposalSnapshot, Error> {
        Self::require_not_paused(&env)?;
        investor.require_auth();

        let config = storage::load_config(&env)?;
        let proposal = registry::get_by_id(&env, proposal_id)?;
        Self::apply_investment(&env, &config, proposal, &investor, amount)
    }

    /// Retry-safe variant of [`ProposalFund::invest`].
    ///
    /// Keys are scoped to `investor`. Replaying a key the investor already
    /// applied with the same `amount` returns the current snapshot without
    /// investing again; replaying it with a different amount fails with
    /// `InvalidState`.
    pub fn invest_with_key(
        env: Env,
        proposal_id: u64,
        investor: Address,
        amount: i128,
        request_key: BytesN<32>,
    ) -> Result<ProposalSnapshot, Error> {
        Self::require_not_paused(&env)?;
        investor.require_auth();

        let config = storage::load_config(&env)?;
        let proposal = registry::get_by_id(&env, proposal_id)?;
        let handle = proposal.handle.clone();

        match storage::applied_request(&env, &handle, &investor, &request_key) {
            Some(applied) if applied == amount => {
                log!(&env, "invest request already applied", proposal_id, request_key);
                return Ok(Self::snapshot_of(&env, proposal, &config));
            }
            Some(applied) => {
                log!(&env, "invest request reused", proposal_id, applied, amount);
                return Err(Error::InvalidState);
            }
            None => {}
        }

        let snapshot = Self::apply_investment(&env, &config, proposal, &investor, amount)?;
        storage::record_request(&env, &handle, &investor, &request_key, amount);
        Ok(snapshot)
    }

    /// Open or close a proposal to new investment. Proposer only, while
    /// `Active`. Reopening requires the platform's `allow_reopen` policy.
    pub fn set_accepting_investment(
        env: Env,
        proposal_id: u64,
        caller: Address,
        accepting: bool,
    ) -> Result<ProposalSnapshot, Error> {
        Self::require_not_paused(&env)?;
        caller.require_auth();

        let config = storage::load_config(&env)?;
        let mut proposal = registry::get_by_id(&env, proposal_id)?;
        let changed =
            lifecycle::set_accepting(&mut proposal, &caller, accepting, config.allow_reopen)?;

        if changed {
            storage::save_proposal_state(&env, &proposal.handle, &proposal.state());
            let mut stats = storage::load_stats(&env);
            stats.closed = if accepting {
                stats.closed.saturating_sub(1)
            } else {
                stats.closed.saturating_add(1)
            };
            storage::save_stats(&env, &stats);
            events::emit_accepting_changed(&env, proposal.id, accepting);
        }

        Ok(Self::snapshot_of(&env, proposal, &config))
    }

    /// Send the raised funds to the target. Proposer only, once the minimum
    /// is reached.
    pub fn execute(env: Env, proposal_id: u64, caller: Address) -> Result<ProposalSnapshot, Error> {
        Self::require_not_paused(&env)?;
        caller.require_auth();

        let config = storage::load_config(&env)?;
        let mut proposal = registry::get_by_id(&env, proposal_id)?;
        let was_closed =
            proposal.state == LifecycleState::Active && !proposal.accepting_investment;

        let now = env.ledger().timestamp();
        let amount = lifecycle::execute(&mut proposal, &caller, now).map_err(|err| {
            log!(&env, "execute rejected", proposal_id, err as u32);
            err
        })?;

        Self::transfer(
            &env,
            &config.token,
            &env.current_contract_address(),
            &proposal.target,
            amount,
        )?;

        storage::save_proposal_state(&env, &proposal.handle, &proposal.state());
        let mut stats = storage::load_stats(&env);
        stats.executed = stats.executed.saturating_add(1);
        if was_closed {
            stats.closed = stats.closed.saturating_sub(1);
        }
        storage::save_stats(&env, &stats);

        events::emit_executed(&env, proposal.id, proposal.target.clone(), amount, now);

        Ok(Self::snapshot_of(&env, proposal, &config))
    }

    /// Pay investors their share of `profit_amount`, paid by the proposer,
    /// at most `max_batch` investors per call.
    ///
    /// Each investor receives
    /// `floor(floor(profit * share% / 100) * contribution / current_amount)`;
    /// the rest never leaves the proposer. The first call declares the
    /// profit and must come after `executed_at + cooldown`, otherwise it
    /// fails with `CooldownNotElapsed` (see
    /// [`ProposalFund::cooldown_remaining`]). Later calls must repeat the same
    /// profit and pick up after the last investor paid. The proposal moves
    /// to `Distributed` with the batch that pays the last investor.
    ///
    /// `max_batch` is capped at [`ledger::MAX_PAYOUT_BATCH`]. Every payment in
    /// a batch succeeds or the batch fails with no state change.
    pub fn distribute(
        env: Env,
        proposal_id: u64,
        caller: Address,
        profit_amount: i128,
        max_batch: u32,
    ) -> Result<DistributionReceipt, Error> {
        Self::require_not_paused(&env)?;
        caller.require_auth();
        if max_batch == 0 {
            return Err(Error::InvalidBatchSize);
        }

        let config = storage::load_config(&env)?;
        let mut proposal = registry::get_by_id(&env, proposal_id)?;
        let now = env.ledger().timestamp();

        if let Err(err) =
            lifecycle::distribute(&mut proposal, &caller, profit_amount, now, config.cooldown_secs)
        {
            if err == Error::CooldownNotElapsed {
                let remaining = lifecycle::cooldown_remaining(&proposal, now, config.cooldown_secs);
                log!(&env, "cooldown not elapsed", proposal_id, remaining);
            }
            return Err(err);
        }

        let batch = ledger::payout_batch(
            &env,
            &proposal,
            max_batch.min(ledger::MAX_PAYOUT_BATCH),
        )?;

        for (investor, share) in batch.payments.iter() {
            Self::transfer(&env, &config.token, &caller, &investor, share)?;
        }

        let mut investors_paid: u32 = 0;
        for (investor, share) in batch.payments.iter() {
            ledger::record_payout(&env, &proposal.handle, &investor, share);
            if share > 0 {
                investors_paid += 1;
                events::emit_profit_paid(&env, proposal.id, investor, share);
            }
        }

        let investor_count = ledger::total_investors(&env, &proposal.handle);
        let complete = lifecycle::advance_payout(
            &mut proposal,
            batch.payments.len(),
            batch.paid,
            investor_count,
        )?;
        let proposer_remainder = amount::sub(profit_amount, proposal.paid_to_investors)?;

        storage::save_proposal_state(&env, &proposal.handle, &proposal.state());

        if complete {
            let mut stats = storage::load_stats(&env);
            stats.executed = stats.executed.saturating_sub(1);
            stats.distributed = stats.distributed.saturating_add(1);
            storage::save_stats(&env, &stats);

            events::emit_distributed(
                &env,
                proposal.id,
                profit_amount,
                proposal.paid_to_investors,
                proposer_remainder,
            );
        }

        Ok(DistributionReceipt {
            profit_amount,
            paid_to_investors: proposal.paid_to_investors,
            proposer_remainder,
            batch_settled: batch.payments.len(),
            investors_paid,
            remaining_investors: investor_count.saturating_sub(proposal.payout_cursor),
            complete,
            snapshot: Self::snapshot_of(&env, proposal, &config),
        })
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_proposal(env: Env, proposal_id: u64) -> Result<ProposalSnapshot, Error> {
        let config = storage::load_config(&env)?;
        let proposal = registry::get_by_id(&env, proposal_id)?;
        Ok(Self::snapshot_of(&env, proposal, &config))
    }

    pub fn get_proposal_by_address(
        env: Env,
        handle: BytesN<32>,
    ) -> Result<ProposalSnapshot, Error> {
        let config = storage::load_config(&env)?;
        let proposal = registry::get(&env, &handle)?;
        Ok(Self::snapshot_of(&env, proposal, &config))
    }

    /// A page of proposals in creation order, at most
    /// [`registry::MAX_PAGE_SIZE`] long.
    pub fn list_proposals(
        env: Env,
        start: u64,
        limit: u32,
    ) -> Result<Vec<ProposalSnapshot>, Error> {
        let config = storage::load_config(&env)?;
        let mut page = Vec::new(&env);
        for proposal in registry::list(&env, start, limit)?.iter() {
            page.push_back(Self::snapshot_of(&env, proposal, &config));
        }
        Ok(page)
    }

    pub fn proposal_count(env: Env) -> u64 {
        storage::proposal_count(&env)
    }

    pub fn get_investment_of(env: Env, proposal_id: u64, investor: Address) -> Result<i128, Error> {
        let proposal = registry::get_by_id(&env, proposal_id)?;
        Ok(ledger::contribution_of(&env, &proposal.handle, &investor))
    }

    /// Investors in order of first contribution.
    pub fn investors_of(env: Env, proposal_id: u64) -> Result<Vec<Address>, Error> {
        let proposal = registry::get_by_id(&env, proposal_id)?;
        ledger::all_investors(&env, &proposal.handle)
    }

    /// Profit actually paid to `investor` at distribution.
    pub fn payout_of(env: Env, proposal_id: u64, investor: Address) -> Result<i128, Error> {
        let proposal = registry::get_by_id(&env, proposal_id)?;
        Ok(ledger::payout_of(&env, &proposal.handle, &investor))
    }

    /// What `investor` would receive if `profit_amount` were distributed now.
    pub fn preview_share(
        env: Env,
        proposal_id: u64,
        investor: Address,
        profit_amount: i128,
    ) -> Result<i128, Error> {
        let proposal = registry::get_by_id(&env, proposal_id)?;
        ledger::share_of(
            &env,
            &proposal.handle,
            &investor,
            profit_amount,
            proposal.investor_share_percent,
            proposal.current_amount,
        )
    }

    /// Seconds until `distribute` is allowed; 0 once open or before execution.
    pub fn cooldown_remaining(env: Env, proposal_id: u64) -> Result<u64, Error> {
        let config = storage::load_config(&env)?;
        let proposal = registry::get_by_id(&env, proposal_id)?;
        Ok(lifecycle::cooldown_remaining(
            &proposal,
            env.ledger().timestamp(),
            config.cooldown_secs,
        ))
    }

    pub fn dashboard_stats(env: Env) -> DashboardStats {
        projection::dashboard(&storage::load_stats(&env))
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    fn require_not_paused(env: &Env) -> Result<(), Error> {
        if storage::is_paused(env) {
            return Err(Error::ProtocolPaused);
        }
        Ok(())
    }

    fn apply_investment(
        env: &Env,
        config: &PlatformConfig,
        mut proposal: Proposal,
        investor: &Address,
        amount: i128,
    ) -> Result<ProposalSnapshot, Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        lifecycle::invest(&mut proposal, amount).map_err(|err| {
            log!(env, "invest rejected", proposal.id, err as u32);
            err
        })?;

        Self::transfer(
            env,
            &config.token,
            investor,
            &env.current_contract_address(),
            amount,
        )?;

        ledger::record_contribution(env, &proposal.handle, investor, amount)?;
        storage::save_proposal_state(env, &proposal.handle, &proposal.state());

        let mut stats = storage::load_stats(env);
        stats.total_raised = amount::add(stats.total_raised, amount)?;
        storage::save_stats(env, &stats);

        events::emit_invested(
            env,
            proposal.id,
            investor.clone(),
            amount,
            proposal.current_amount,
        );

        Ok(Self::snapshot_of(env, proposal, config))
    }

    fn transfer(
        env: &Env,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        if amount == 0 {
            return Ok(());
        }
        let client = token::Client::new(env, token);
        match client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => {
                log!(env, "token transfer failed", from.clone(), to.clone(), amount);
                Err(Error::TransferFailed)
            }
        }
    }

    fn snapshot_of(env: &Env, proposal: Proposal, config: &PlatformConfig) -> ProposalSnapshot {
        let investor_count = ledger::total_investors(env, &proposal.handle);
        projection::snapshot(
            proposal,
            investor_count,
            env.ledger().timestamp(),
            config.cooldown_secs,
        )
    }
}
