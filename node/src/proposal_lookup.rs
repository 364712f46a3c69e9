// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use identifier::RepoName;
use push_handler::ProposalLookup;

use crate::repository_ledger::RepositoryLedger;

/// Answers `push_handler`'s "has this merge-write's gating proposal been
/// accepted?" question against the node's [`RepositoryLedger`], the same
/// seam that stands in for consensus-sourced repository state elsewhere in
/// this crate.
pub struct LedgerProposalLookup<'a> {
    pub ledger: &'a RepositoryLedger,
}

impl ProposalLookup for LedgerProposalLookup<'_> {
    fn is_accepted(&self, repo: &RepoName, proposal_id: &str) -> bool {
        let Some(repository) = self.ledger.get(repo) else { return false };
        repository
            .proposals
            .get(proposal_id)
            .and_then(|proposal| proposal.outcome)
            .map(|outcome| outcome.is_accepted())
            .unwrap_or(false)
    }
}
