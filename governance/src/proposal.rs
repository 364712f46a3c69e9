// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::collections::BTreeMap;

use git_ext::Oid;
use identifier::UserAddress;
use rust_decimal::Decimal;

use crate::{
    action::Action,
    config::{FeeRefundPolicy, RepoConfigGovernance},
    outcome::Outcome,
    Error,
};

/// A single ballot's choice.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoteChoice {
    Yes,
    No,
    NoWithVeto,
    Abstain,
}

fn derive_id(action: &Action, supplied_id: &str) -> String {
    match action {
        Action::MergeRequest(_) => format!("MR{supplied_id}"),
        _ => supplied_id.to_string(),
    }
}

/// A repo proposal: the state machine merge requests (and the other
/// closed-set [`Action`]s) are instances of (spec.md §4.7).
///
/// Per design note 9, `config` is the repository's governance configuration
/// *snapshotted by value* at creation height — the proposal never holds a
/// back-reference into the repository that owns it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RepoProposal {
    pub id: String,
    pub action: Action,
    pub creator: UserAddress,
    pub height: u64,
    pub end_at: u64,
    pub fee_deposit_end_at: u64,
    /// Block height voting power is sampled at, fixed at creation so a
    /// voter cannot inflate their weight after the proposal is public.
    pub power_age: u64,
    pub yes: Decimal,
    pub no: Decimal,
    pub no_with_veto: Decimal,
    pub no_with_veto_by_owners: Decimal,
    pub abstain: Decimal,
    /// Total weight cast by owners, of any choice — needed to compute the
    /// owner-veto ratio; not itself one of spec.md §3's named fields, but
    /// required to make that ratio a function of recorded tallies alone.
    pub owner_votes_total: Decimal,
    pub fees: BTreeMap<UserAddress, Decimal>,
    pub outcome: Option<Outcome>,
    pub config: RepoConfigGovernance,
}

impl RepoProposal {
    /// Instantiates a proposal at `create_height`, deriving its id (`MR` +
    /// `supplied_id` for merge requests, the bare id otherwise) and
    /// snapshotting `config`. Rejects `MergeRequest` actions missing their
    /// base/target hash (S5), and configs whose deposit window would
    /// outlive the voting window (DESIGN.md's Open Question resolution).
    pub fn create(
        supplied_id: &str,
        creator: UserAddress,
        action: Action,
        config: RepoConfigGovernance,
        create_height: u64,
    ) -> Result<Self, Error> {
        if let Action::MergeRequest(ref data) = action {
            data.validate()?;
        }
        if !config.deposit_window_within_voting_window() {
            return Err(Error::DepositWindowAfterEnd);
        }

        let id = derive_id(&action, supplied_id);
        let end_at = create_height + config.prop_duration;
        let fee_deposit_end_at = if config.prop_fee_deposit_dur == 0 {
            0
        } else {
            create_height + config.prop_fee_deposit_dur
        };

        let mut fees = BTreeMap::new();
        fees.insert(creator.clone(), config.prop_fee);

        Ok(Self {
            id,
            action,
            creator,
            height: create_height,
            end_at,
            fee_deposit_end_at,
            power_age: create_height,
            yes: Decimal::ZERO,
            no: Decimal::ZERO,
            no_with_veto: Decimal::ZERO,
            no_with_veto_by_owners: Decimal::ZERO,
            abstain: Decimal::ZERO,
            owner_votes_total: Decimal::ZERO,
            fees,
            outcome: None,
            config,
        })
    }

    pub fn is_finalized(&self) -> bool {
        self.outcome.is_some()
    }

    /// Overwrites any of the four merge-request fields with a non-empty
    /// value, while the proposal is still open (spec.md §4.7 "Update").
    pub fn update_merge_request(
        &mut self,
        base_branch: Option<String>,
        base_hash: Option<Oid>,
        target_branch: Option<String>,
        target_hash: Option<Oid>,
    ) -> Result<(), Error> {
        if self.is_finalized() {
            return Err(Error::AlreadyClosed);
        }
        let data = match &mut self.action {
            Action::MergeRequest(data) => data,
            _ => return Err(Error::InvalidActionData),
        };
        if let Some(v) = base_branch {
            if !v.is_empty() {
                data.base_branch = v;
            }
        }
        if let Some(v) = base_hash {
            data.base_hash = Some(v);
        }
        if let Some(v) = target_branch {
            if !v.is_empty() {
                data.target_branch = v;
            }
        }
        if let Some(v) = target_hash {
            data.target_hash = Some(v);
        }
        Ok(())
    }

    /// Adds to `address`'s fee deposit, enforcing the deposit window.
    pub fn add_fee(&mut self, address: UserAddress, amount: Decimal, height: u64) -> Result<(), Error> {
        if self.is_finalized() {
            return Err(Error::AlreadyClosed);
        }
        if self.fee_deposit_end_at != 0 && height > self.fee_deposit_end_at {
            return Err(Error::DepositWindowClosed);
        }
        *self.fees.entry(address).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    pub fn fees_total(&self) -> Decimal {
        self.fees.values().sum()
    }

    /// Records a ballot. Vote weight resolution (balance/stake lookups) is
    /// the caller's concern — this just accumulates whatever weight it is
    /// given, keeping the tally a pure function of recorded inputs
    /// (invariant 5).
    pub fn vote(&mut self, weight: Decimal, choice: VoteChoice, is_owner: bool) -> Result<(), Error> {
        if self.is_finalized() {
            return Err(Error::AlreadyClosed);
        }
        match choice {
            VoteChoice::Yes => self.yes += weight,
            VoteChoice::No => self.no += weight,
            VoteChoice::NoWithVeto => {
                self.no_with_veto += weight;
                if is_owner {
                    self.no_with_veto_by_owners += weight;
                }
            }
            VoteChoice::Abstain => self.abstain += weight,
        }
        if is_owner {
            self.owner_votes_total += weight;
        }
        Ok(())
    }

    /// Pure outcome computation over the recorded tallies, `fees` and
    /// `total_eligible_weight` (invariant 5: "outcome is a pure function of
    /// `(config, votes, fees, endAtHeight)`" — `end_at` is baked into
    /// `self` already, so it need not be a parameter here).
    fn evaluate(&self, total_eligible_weight: Decimal) -> Outcome {
        if self.fee_deposit_end_at != 0 && self.fees_total() < self.config.prop_fee {
            return Outcome::InsufficientDeposit;
        }

        if total_eligible_weight.is_zero() {
            return Outcome::QuorumNotMet;
        }

        let participating = self.yes + self.no + self.no_with_veto + self.abstain;
        let participation = participating / total_eligible_weight;
        if participation < self.config.quorum {
            return Outcome::QuorumNotMet;
        }

        let non_abstain = self.yes + self.no + self.no_with_veto;
        if !non_abstain.is_zero() && self.no_with_veto / non_abstain >= self.config.veto_quorum {
            return Outcome::RejectedWithVeto;
        }

        if !self.owner_votes_total.is_zero()
            && self.no_with_veto_by_owners / self.owner_votes_total >= self.config.veto_owners_quorum
        {
            return Outcome::RejectedWithVetoByOwners;
        }

        let yes_no = self.yes + self.no;
        if yes_no.is_zero() {
            return Outcome::Rejected;
        }
        if self.yes / yes_no >= self.config.threshold {
            return Outcome::Accepted;
        }
        if self.yes > self.no {
            Outcome::BelowThreshold
        } else {
            Outcome::Rejected
        }
    }

    /// Evaluates and records the outcome, to be called once voting closes
    /// (either `end_at` is reached or every eligible voter has voted).
    pub fn finalize(&mut self, total_eligible_weight: Decimal) -> Outcome {
        let outcome = self.evaluate(total_eligible_weight);
        self.outcome = Some(outcome);
        outcome
    }

    /// Whether the creator's (and any co-depositors') fee should be
    /// refunded, per `config.fee_refund` and the recorded outcome
    /// (spec.md §4.7 "Fee refund").
    pub fn refund_applies(&self) -> bool {
        refund_for_policy(&self.config.fee_refund, self.outcome)
    }
}

fn refund_for_policy(policy: &FeeRefundPolicy, outcome: Option<Outcome>) -> bool {
    let Some(outcome) = outcome else { return false };
    match policy {
        FeeRefundPolicy::No => false,
        FeeRefundPolicy::OnAccept => outcome.is_accepted(),
        FeeRefundPolicy::OnAcceptReject => outcome.is_accepted() || matches!(outcome, Outcome::Rejected),
        FeeRefundPolicy::OnAcceptAllReject => outcome.is_accepted() || outcome.is_rejection(),
        FeeRefundPolicy::OnBelowThreshold { extra } => {
            outcome.is_accepted()
                || matches!(outcome, Outcome::BelowThreshold)
                || refund_for_policy(extra, Some(outcome))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::MergeRequestData;

    fn config() -> RepoConfigGovernance {
        RepoConfigGovernance {
            prop_duration: 100,
            prop_fee_deposit_dur: 10,
            prop_fee: Decimal::from(5),
            quorum: Decimal::new(5, 1),
            threshold: Decimal::new(5, 1),
            veto_quorum: Decimal::new(33, 2),
            veto_owners_quorum: Decimal::new(5, 1),
            voting_weight: crate::config::VotingWeight::Identity,
            fee_refund: FeeRefundPolicy::OnAccept,
        }
    }

    fn addr() -> UserAddress {
        UserAddress::from(crypto::SecretKey::new().public())
    }

    fn mr_action(with_hashes: bool) -> Action {
        Action::MergeRequest(MergeRequestData {
            base_branch: "master".to_string(),
            base_hash: with_hashes.then(|| "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap()),
            target_branch: "feature".to_string(),
            target_hash: with_hashes.then(|| "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap()),
        })
    }

    /// S5 — merge-request creation with missing base/target hash.
    #[test]
    fn create_rejects_merge_request_missing_base_hash() {
        let err = RepoProposal::create("1", addr(), mr_action(false), config(), 0).unwrap_err();
        assert!(matches!(err, Error::MissingBaseHash));
    }

    #[test]
    fn create_derives_mr_prefixed_id_for_merge_requests() {
        let p = RepoProposal::create("1", addr(), mr_action(true), config(), 0).unwrap();
        assert_eq!(p.id, "MR1");
        assert_eq!(p.end_at, 100);
        assert_eq!(p.fee_deposit_end_at, 10);
        assert_eq!(p.fees_total(), Decimal::from(5));
    }

    #[test]
    fn deposit_window_outliving_voting_window_is_rejected() {
        let mut c = config();
        c.prop_fee_deposit_dur = 200;
        let err = RepoProposal::create("1", addr(), mr_action(true), c, 0).unwrap_err();
        assert!(matches!(err, Error::DepositWindowAfterEnd));
    }

    #[test]
    fn zero_deposit_window_skips_deposit_requirement() {
        let mut c = config();
        c.prop_fee_deposit_dur = 0;
        let mut p = RepoProposal::create("1", addr(), mr_action(true), c, 0).unwrap();
        assert_eq!(p.fee_deposit_end_at, 0);
        p.yes = Decimal::from(10);
        assert_eq!(p.finalize(Decimal::from(10)), Outcome::Accepted);
    }

    #[test]
    fn update_is_rejected_once_finalized() {
        let mut p = RepoProposal::create("1", addr(), mr_action(true), config(), 0).unwrap();
        p.finalize(Decimal::from(10));
        let err = p.update_merge_request(Some("other".into()), None, None, None).unwrap_err();
        assert!(matches!(err, Error::AlreadyClosed));
    }

    #[test]
    fn insufficient_deposit_short_circuits_other_checks() {
        let mut p = RepoProposal::create("1", addr(), mr_action(true), config(), 0).unwrap();
        p.yes = Decimal::from(100);
        assert_eq!(p.finalize(Decimal::from(100)), Outcome::InsufficientDeposit);
    }

    #[test]
    fn quorum_not_met_when_participation_below_threshold() {
        let mut p = RepoProposal::create("1", addr(), mr_action(true), config(), 0).unwrap();
        p.add_fee(p.creator, Decimal::from(5), 0).unwrap();
        p.yes = Decimal::from(1);
        assert_eq!(p.finalize(Decimal::from(100)), Outcome::QuorumNotMet);
    }

    #[test]
    fn veto_quorum_rejects_with_veto() {
        let mut p = RepoProposal::create("1", addr(), mr_action(true), config(), 0).unwrap();
        p.add_fee(p.creator, Decimal::from(5), 0).unwrap();
        p.yes = Decimal::from(10);
        p.no_with_veto = Decimal::from(60);
        assert_eq!(p.finalize(Decimal::from(100)), Outcome::RejectedWithVeto);
    }

    #[test]
    fn owner_veto_quorum_rejects_with_veto_by_owners() {
        let mut p = RepoProposal::create("1", addr(), mr_action(true), config(), 0).unwrap();
        p.add_fee(p.creator, Decimal::from(5), 0).unwrap();
        p.yes = Decimal::from(60);
        p.vote(Decimal::from(40), VoteChoice::NoWithVeto, true).unwrap();
        assert_eq!(p.finalize(Decimal::from(100)), Outcome::RejectedWithVetoByOwners);
    }

    #[test]
    fn accepted_when_yes_share_clears_threshold() {
        let mut p = RepoProposal::create("1", addr(), mr_action(true), config(), 0).unwrap();
        p.add_fee(p.creator, Decimal::from(5), 0).unwrap();
        p.yes = Decimal::from(60);
        p.no = Decimal::from(10);
        assert_eq!(p.finalize(Decimal::from(100)), Outcome::Accepted);
    }

    #[test]
    fn below_threshold_when_yes_majority_but_thin() {
        let mut p = RepoProposal::create("1", addr(), mr_action(true), config(), 0).unwrap();
        p.add_fee(p.creator, Decimal::from(5), 0).unwrap();
        p.yes = Decimal::from(51);
        p.no = Decimal::from(49);
        assert_eq!(p.finalize(Decimal::from(100)), Outcome::BelowThreshold);
    }

    #[test]
    fn refund_on_accept_policy_only_refunds_acceptance() {
        let mut p = RepoProposal::create("1", addr(), mr_action(true), config(), 0).unwrap();
        p.add_fee(p.creator, Decimal::from(5), 0).unwrap();
        p.yes = Decimal::from(60);
        p.finalize(Decimal::from(100));
        assert!(p.refund_applies());

        let mut p2 = RepoProposal::create("2", addr(), mr_action(true), config(), 0).unwrap();
        p2.add_fee(p2.creator, Decimal::from(5), 0).unwrap();
        p2.no = Decimal::from(60);
        p2.finalize(Decimal::from(100));
        assert!(!p2.refund_applies());
    }
}
