//! # Types
//!
//! Shared data structures used across all modules of the proposal engine.
//!
//! ## Config / State split
//!
//! A proposal is stored as two ledger entries:
//!
//! - [`ProposalConfig`] — written once by `create_proposal`; never mutated.
//! - [`ProposalState`] — written on every investment and lifecycle transition.
//!
//! The public API returns the reconstructed [`Proposal`], usually wrapped in a
//! [`ProposalSnapshot`] that carries the derived dashboard fields.
//!
//! ## Lifecycle
//!
//! ```text
//! Active ──► Executed ──► Distributed
//! ```
//!
//! `accepting_investment` is orthogonal to [`LifecycleState`]: an `Active`
//! proposal may be closed to new investment and still be executed.
//! Distribution is paid in batches; the proposal stays `Executed` until the
//! last investor is paid. `Distributed` is terminal.

use soroban_sdk::{contracttype, Address, BytesN};

/// Lifecycle position of a proposal.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleState {
    /// Raising funds; may be executed once the minimum is reached.
    Active,
    /// Funds transferred to the target; waiting for the cooldown.
    Executed,
    /// Profit paid out. Terminal.
    Distributed,
}

/// Dashboard label derived from the lifecycle state, the investment flag and
/// the funding threshold.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusLabel {
    Inactive,
    Active,
    Funded,
    Executed,
    Completed,
}

/// Caller-supplied parameters for `create_proposal`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalParams {
    pub id: u64,
    pub proposer: Address,
    pub target: Address,
    pub min_amount: i128,
    pub max_amount: i128,
    pub investor_share_percent: u32,
}

/// Immutable proposal configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalConfig {
    pub handle: BytesN<32>,
    pub id: u64,
    pub proposer: Address,
    pub target: Address,
    pub min_amount: i128,
    pub max_amount: i128,
    pub investor_share_percent: u32,
    pub created_at: u64,
}

/// Mutable proposal state, updated on investments and transitions.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalState {
    pub state: LifecycleState,
    pub accepting_investment: bool,
    pub current_amount: i128,
    pub executed_at: Option<u64>,
    pub distributed_profit: Option<i128>,
    pub payout_cursor: u32,
    pub paid_to_investors: i128,
}

/// Full representation of a proposal, reconstructed from config and state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    /// Generated 32-byte identity (the proposal's "address").
    pub handle: BytesN<32>,
    /// Caller-assigned id, unique across the registry.
    pub id: u64,
    /// Creator; sole authority for execute and distribute.
    pub proposer: Address,
    /// Receives the raised funds on execution.
    pub target: Address,
    /// Threshold that must be reached before execution.
    pub min_amount: i128,
    /// Funding cap; investments beyond it are rejected.
    pub max_amount: i128,
    /// Percentage of the declared profit reserved for investors, 1–99.
    pub investor_share_percent: u32,
    pub created_at: u64,
    pub state: LifecycleState,
    pub accepting_investment: bool,
    /// Sum of all contributions. Frozen once executed.
    pub current_amount: i128,
    /// Ledger timestamp of execution, set exactly once.
    pub executed_at: Option<u64>,
    /// Profit declared by the first distribution batch; later batches must
    /// repeat it.
    pub distributed_profit: Option<i128>,
    /// Investors already paid, in first-contribution order.
    pub payout_cursor: u32,
    /// Sum of every investor payment made so far.
    pub paid_to_investors: i128,
}

impl Proposal {
    pub fn from_parts(config: ProposalConfig, state: ProposalState) -> Self {
        Proposal {
            handle: config.handle,
            id: config.id,
            proposer: config.proposer,
            target: config.target,
            min_amount: config.min_amount,
            max_amount: config.max_amount,
            investor_share_percent: config.investor_share_percent,
            created_at: config.created_at,
            state: state.state,
            accepting_investment: state.accepting_investment,
            current_amount: state.current_amount,
            executed_at: state.executed_at,
            distributed_profit: state.distributed_profit,
            payout_cursor: state.payout_cursor,
            paid_to_investors: state.paid_to_investors,
        }
    }

    pub fn config(&self) -> ProposalConfig {
        ProposalConfig {
            handle: self.handle.clone(),
            id: self.id,
            proposer: self.proposer.clone(),
            target: self.target.clone(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            investor_share_percent: self.investor_share_percent,
            created_at: self.created_at,
        }
    }

    pub fn state(&self) -> ProposalState {
        ProposalState {
            state: self.state,
            accepting_investment: self.accepting_investment,
            current_amount: self.current_amount,
            executed_at: self.executed_at,
            distributed_profit: self.distributed_profit,
            payout_cursor: self.payout_cursor,
            paid_to_investors: self.paid_to_investors,
        }
    }
}

/// A proposal together with every field derived from it, read atomically.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalSnapshot {
    pub proposal: Proposal,
    pub investor_count: u32,
    pub threshold_reached: bool,
    /// `current / max` in basis points, unclamped.
    pub progress_bps: i128,
    /// `current / max` in whole percent, clamped to 100.
    pub display_percent: u32,
    pub status: StatusLabel,
    pub can_distribute: bool,
    /// Seconds until distribution opens; 0 when open or not executed.
    pub cooldown_remaining: u64,
}

/// Outcome of one successful `distribute` batch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionReceipt {
    pub profit_amount: i128,
    /// Sum of every investor payment so far, this batch included.
    pub paid_to_investors: i128,
    /// `profit_amount - paid_to_investors`. Final once `complete`; never
    /// leaves the proposer.
    pub proposer_remainder: i128,
    /// Investors settled by this batch.
    pub batch_settled: u32,
    /// Investors in this batch that received a non-zero payment.
    pub investors_paid: u32,
    /// Investors still waiting for a later batch.
    pub remaining_investors: u32,
    /// Whether the proposal reached `Distributed` with this batch.
    pub complete: bool,
    pub snapshot: ProposalSnapshot,
}

/// Platform-wide settings fixed at `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformConfig {
    /// Token every investment and payout is denominated in.
    pub token: Address,
    /// Seconds between execution and distribution eligibility.
    pub cooldown_secs: u64,
    /// Whether a proposer may reopen a proposal closed to investment.
    pub allow_reopen: bool,
}

/// Running counters maintained on every transition, so the dashboard never
/// has to walk the registry.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PlatformStats {
    pub total_proposals: u64,
    /// `Active` proposals currently closed to investment.
    pub closed: u64,
    /// Proposals currently in `Executed`.
    pub executed: u64,
    pub distributed: u64,
    /// Sum of every accepted investment.
    pub total_raised: i128,
}

/// Aggregates shown on the dashboard header.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DashboardStats {
    pub total_proposals: u64,
    /// Accepting investment and not yet executed.
    pub active_proposals: u64,
    /// Executed, profit not yet distributed.
    pub awaiting_distribution: u64,
    pub completed_proposals: u64,
    pub total_funding: i128,
}
