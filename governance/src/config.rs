// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use rust_decimal::Decimal;

/// How a voter's ballot is weighted (spec.md §4.7 "Voting weights").
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum VotingWeight {
    /// One vote per eligible voter.
    Identity,
    /// Weighted by the voter's spendable balance.
    CoinWeighted,
    /// Weighted by the voter's total net stake.
    NetStake,
    /// Weighted by stake the voter holds directly (not delegated to them).
    NetStakeNonDelegated,
    /// Weighted by stake delegated to the voter by others.
    NetStakeOfDelegators,
}

/// How (and whether) a proposer's fee deposit is refunded, keyed by
/// outcome (spec.md §4.7 "Fee refund").
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FeeRefundPolicy {
    /// Never refunded.
    No,
    /// Refunded only if the proposal is accepted.
    OnAccept,
    /// Refunded on acceptance or plain rejection (not veto).
    OnAcceptReject,
    /// Refunded on acceptance or any rejection outcome (including vetoes).
    OnAcceptAllReject,
    /// Refunded on acceptance or `BelowThreshold`, on top of whatever
    /// `extra` additionally covers.
    OnBelowThreshold { extra: Box<FeeRefundPolicy> },
}

/// The governance parameters a repository snapshots into every proposal it
/// creates (spec.md §3 `RepoProposal.config`).
///
/// Per design note 9 ("cyclic state between repo and proposal"), this is
/// the *value* a proposal stores — the repository never holds a reference
/// back into a proposal, so the proposal is self-contained once created.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RepoConfigGovernance {
    /// Blocks the voting window stays open for after proposal creation.
    pub prop_duration: u64,
    /// Blocks the fee-deposit window stays open for; `0` disables it.
    pub prop_fee_deposit_dur: u64,
    /// Total fee a proposal must collect in deposits to be valid, when the
    /// deposit window is enabled.
    pub prop_fee: Decimal,
    /// Minimum participation (as a fraction of total eligible weight) for
    /// the vote to be decisive at all.
    pub quorum: Decimal,
    /// Minimum `yes / (yes + no)` fraction for acceptance.
    pub threshold: Decimal,
    /// Minimum `noWithVeto / nonAbstain` fraction to veto.
    pub veto_quorum: Decimal,
    /// Minimum `noWithVetoByOwners / ownerVotes` fraction for an
    /// owner-only veto.
    pub veto_owners_quorum: Decimal,
    pub voting_weight: VotingWeight,
    pub fee_refund: FeeRefundPolicy,
}

impl RepoConfigGovernance {
    /// Rejects configurations where `feeDepositEndAt` would land after
    /// `endAt`, per the Open Question resolution in DESIGN.md.
    pub fn deposit_window_within_voting_window(&self) -> bool {
        self.prop_fee_deposit_dur == 0 || self.prop_fee_deposit_dur <= self.prop_duration
    }
}
