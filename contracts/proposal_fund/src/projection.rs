//! # Projection
//!
//! Read-only values derived from a proposal. Everything here is a pure
//! function of one [`Proposal`] read, so the flags shown together can never
//! disagree with each other.

use crate::amount::BPS_DENOMINATOR;
use crate::lifecycle;
use crate::types::{
    DashboardStats, LifecycleState, PlatformStats, Proposal, ProposalSnapshot, StatusLabel,
};

/// `current / max` in basis points, not clamped. Values above 10 000 should
/// be impossible but are reported as-is.
pub fn progress_bps(proposal: &Proposal) -> i128 {
    if proposal.max_amount <= 0 {
        return 0;
    }
    proposal
        .current_amount
        .checked_mul(BPS_DENOMINATOR)
        .map(|v| v / proposal.max_amount)
        .unwrap_or(i128::MAX)
}

/// Whole percent funded, clamped to `0..=100` for display.
pub fn display_percent(proposal: &Proposal) -> u32 {
    let percent = progress_bps(proposal) / 100;
    percent.clamp(0, 100) as u32
}

pub fn status(proposal: &Proposal) -> StatusLabel {
    match proposal.state {
        LifecycleState::Distributed => StatusLabel::Completed,
        LifecycleState::Executed => StatusLabel::Executed,
        LifecycleState::Active if lifecycle::threshold_reached(proposal) => StatusLabel::Funded,
        LifecycleState::Active if proposal.accepting_investment => StatusLabel::Active,
        LifecycleState::Active => StatusLabel::Inactive,
    }
}

pub fn snapshot(
    proposal: Proposal,
    investor_count: u32,
    now: u64,
    cooldown_secs: u64,
) -> ProposalSnapshot {
    ProposalSnapshot {
        investor_count,
        threshold_reached: lifecycle::threshold_reached(&proposal),
        progress_bps: progress_bps(&proposal),
        display_percent: display_percent(&proposal),
        status: status(&proposal),
        can_distribute: lifecycle::can_distribute(&proposal, now, cooldown_secs),
        cooldown_remaining: lifecycle::cooldown_remaining(&proposal, now, cooldown_secs),
        proposal,
    }
}

pub fn dashboard(stats: &PlatformStats) -> DashboardStats {
    let settled = stats.executed.saturating_add(stats.distributed);
    DashboardStats {
        total_proposals: stats.total_proposals,
        active_proposals: stats
            .total_proposals
            .saturating_sub(settled)
            .saturating_sub(stats.closed),
        awaiting_distribution: stats.executed,
        completed_proposals: stats.distributed,
        total_funding: stats.total_raised,
    }
}
