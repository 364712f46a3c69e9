// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! Function-injected collaborators (design note 9) at the push handler's
//! boundary: talking back to the git receive-pack conversation, and
//! resolving whether a merge-write's gating proposal has been accepted.
//! Neither concern is this crate's to own — the pkt-line wire format and
//! governance's proposal store are both collaborators — so both arrive as
//! small capability traits instead of concrete dependencies.

use git_ext::Qualified;
use identifier::RepoName;

/// Reports the push handler's verdict back to the client's receive-pack
/// conversation.
pub trait GitReceiver {
    /// All references in this push are accepted; apply the packfile.
    fn accept(&self, refs: &[Qualified]);

    /// The whole push is rejected; no reference is left half-accepted
    /// (spec.md §4.3 "Failure policy").
    fn reject(&self, refs: &[Qualified], reason: &str);
}

/// Resolves whether a merge-request proposal has reached `Accepted`.
/// Governance's proposal store lives outside the push path; this trait is
/// how the push handler asks it a yes/no question without depending on it.
pub trait ProposalLookup {
    fn is_accepted(&self, repo: &RepoName, proposal_id: &str) -> bool;
}
