// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::collections::HashMap;

use identifier::RepoName;
use parking_lot::RwLock;

/// In-memory governance/authorization state for every repository this node
/// manages. A real node sources `authz::Repository` from the consensus
/// layer's state machine (spec.md §1's "out of scope, specified only as a
/// collaborator"); this ledger is the seam `push_handler::handle_stream`
/// reads through until that collaborator exists.
#[derive(Default)]
pub struct RepositoryLedger {
    repos: RwLock<HashMap<RepoName, authz::Repository>>,
}

impl RepositoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: RepoName, repo: authz::Repository) {
        self.repos.write().insert(name, repo);
    }

    pub fn get(&self, name: &RepoName) -> Option<authz::Repository> {
        self.repos.read().get(name).cloned()
    }

    pub fn contains(&self, name: &RepoName) -> bool {
        self.repos.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.repos.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn sample_repo() -> authz::Repository {
        authz::Repository::new(
            authz::RepoConfig {
                governance: governance::RepoConfigGovernance {
                    prop_duration: 100,
                    prop_fee_deposit_dur: 0,
                    prop_fee: Decimal::ZERO,
                    quorum: Decimal::new(5, 1),
                    threshold: Decimal::new(5, 1),
                    veto_quorum: Decimal::new(33, 2),
                    veto_owners_quorum: Decimal::new(5, 1),
                    voting_weight: governance::VotingWeight::Identity,
                    fee_refund: governance::FeeRefundPolicy::No,
                },
                policies: vec![],
            },
            0,
        )
    }

    #[test]
    fn insert_then_get_round_trips() {
        let ledger = RepositoryLedger::new();
        let name: RepoName = "repo1".parse().unwrap();
        ledger.insert(name.clone(), sample_repo());
        assert!(ledger.contains(&name));
        assert!(ledger.get(&name).is_some());
    }

    #[test]
    fn unknown_repo_is_none() {
        let ledger = RepositoryLedger::new();
        assert!(ledger.get(&"missing".parse().unwrap()).is_none());
    }

    #[test]
    fn len_counts_distinct_repos() {
        let ledger = RepositoryLedger::new();
        assert!(ledger.is_empty());
        ledger.insert("repo1".parse().unwrap(), sample_repo());
        ledger.insert("repo2".parse().unwrap(), sample_repo());
        assert_eq!(ledger.len(), 2);
        assert!(!ledger.is_empty());
    }
}
