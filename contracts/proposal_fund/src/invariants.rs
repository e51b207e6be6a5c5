#![allow(dead_code)]

extern crate std;

use crate::types::{LifecycleState, Proposal};

/// INV-1: `0 <= current_amount <= max_amount`.
pub fn assert_amount_within_cap(proposal: &Proposal) {
    assert!(
        proposal.current_amount >= 0,
        "INV-1 violated: proposal {} has negative current amount ({})",
        proposal.id,
        proposal.current_amount
    );
    assert!(
        proposal.current_amount <= proposal.max_amount,
        "INV-1 violated: proposal {} raised {} above cap {}",
        proposal.id,
        proposal.current_amount,
        proposal.max_amount
    );
}

/// INV-2: `max_amount > min_amount > 0` and share in 1..=99.
pub fn assert_parameters_valid(proposal: &Proposal) {
    assert!(
        proposal.min_amount > 0 && proposal.max_amount > proposal.min_amount,
        "INV-2 violated: proposal {} has band {}..{}",
        proposal.id,
        proposal.min_amount,
        proposal.max_amount
    );
    assert!(
        (1..=99).contains(&proposal.investor_share_percent),
        "INV-2 violated: proposal {} has share {}",
        proposal.id,
        proposal.investor_share_percent
    );
}

/// INV-3: `executed_at` is set exactly when the proposal left `Active`, only
/// `Active` proposals may accept investment, and payouts never exceed the
/// investor pool of the declared profit.
pub fn assert_lifecycle_fields_consistent(proposal: &Proposal) {
    match proposal.state {
        LifecycleState::Active => {
            assert!(
                proposal.executed_at.is_none(),
                "INV-3 violated: active proposal {} has executed_at",
                proposal.id
            );
            assert!(
                proposal.distributed_profit.is_none() && proposal.payout_cursor == 0,
                "INV-3 violated: active proposal {} has started paying out",
                proposal.id
            );
        }
        LifecycleState::Executed | LifecycleState::Distributed => {
            assert!(
                proposal.executed_at.is_some(),
                "INV-3 violated: proposal {} left Active without executed_at",
                proposal.id
            );
            assert!(
                !proposal.accepting_investment,
                "INV-3 violated: proposal {} accepts investment after execution",
                proposal.id
            );
            assert!(
                proposal.current_amount >= proposal.min_amount,
                "INV-3 violated: proposal {} executed below threshold",
                proposal.id
            );
        }
    }
    if proposal.state == LifecycleState::Distributed {
        assert!(
            proposal.distributed_profit.is_some(),
            "INV-3 violated: proposal {} distributed without a declared profit",
            proposal.id
        );
    }
    if let Some(profit) = proposal.distributed_profit {
        let pool = profit * proposal.investor_share_percent as i128 / 100;
        assert!(
            proposal.paid_to_investors >= 0 && proposal.paid_to_investors <= pool,
            "INV-3 violated: proposal {} paid {} from a pool of {}",
            proposal.id,
            proposal.paid_to_investors,
            pool
        );
    }
}

/// INV-4: the ledger aggregate equals the proposal's current amount.
pub fn assert_ledger_matches(proposal: &Proposal, contributions: &[i128]) {
    let sum: i128 = contributions.iter().sum();
    assert_eq!(
        sum, proposal.current_amount,
        "INV-4 violated: contributions sum to {} but proposal {} holds {}",
        sum, proposal.id, proposal.current_amount
    );
}

/// INV-5: `current_amount` never decreases while `Active` and never changes
/// after execution.
pub fn assert_amount_monotonic(before: &Proposal, after: &Proposal) {
    match before.state {
        LifecycleState::Active => assert!(
            after.current_amount >= before.current_amount,
            "INV-5 violated: current amount fell from {} to {}",
            before.current_amount,
            after.current_amount
        ),
        _ => assert_eq!(
            after.current_amount, before.current_amount,
            "INV-5 violated: current amount changed after execution"
        ),
    }
}

/// INV-6: only forward transitions, one step at a time.
pub fn assert_valid_transition(from: &LifecycleState, to: &LifecycleState) {
    let valid = matches!(
        (from, to),
        (LifecycleState::Active, LifecycleState::Active)
            | (LifecycleState::Active, LifecycleState::Executed)
            | (LifecycleState::Executed, LifecycleState::Executed)
            | (LifecycleState::Executed, LifecycleState::Distributed)
            | (LifecycleState::Distributed, LifecycleState::Distributed)
    );
    assert!(
        valid,
        "INV-6 violated: invalid transition from {:?} to {:?}",
        from, to
    );
}

/// INV-7: fields fixed at creation never change.
pub fn assert_immutable_fields(original: &Proposal, current: &Proposal) {
    assert_eq!(original.handle, current.handle, "INV-7 violated: handle changed");
    assert_eq!(original.id, current.id, "INV-7 violated: id changed");
    assert_eq!(original.proposer, current.proposer, "INV-7 violated: proposer changed");
    assert_eq!(original.target, current.target, "INV-7 violated: target changed");
    assert_eq!(original.min_amount, current.min_amount, "INV-7 violated: min changed");
    assert_eq!(original.max_amount, current.max_amount, "INV-7 violated: max changed");
    assert_eq!(
        original.investor_share_percent, current.investor_share_percent,
        "INV-7 violated: investor share changed"
    );
    assert_eq!(original.created_at, current.created_at, "INV-7 violated: created_at changed");
}

/// INV-8: investor shares plus the proposer remainder equal the profit, and
/// investors never receive more than their pool.
pub fn assert_profit_conserved(profit: i128, percent: u32, shares: &[i128], remainder: i128) {
    let paid: i128 = shares.iter().sum();
    assert_eq!(
        paid + remainder,
        profit,
        "INV-8 violated: {} paid + {} kept != {} profit",
        paid,
        remainder,
        profit
    );
    let pool = profit * percent as i128 / 100;
    assert!(
        paid <= pool,
        "INV-8 violated: investors received {} from a pool of {}",
        paid,
        pool
    );
    assert!(shares.iter().all(|s| *s >= 0), "INV-8 violated: negative share");
}

/// Run all stateless proposal invariants.
pub fn assert_all_proposal_invariants(proposal: &Proposal) {
    assert_amount_within_cap(proposal);
    assert_parameters_valid(proposal);
    assert_lifecycle_fields_consistent(proposal);
}
