// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

/// The terminal classification of a [`crate::RepoProposal`] once its voting
/// window closes (spec.md §3, §4.7).
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Outcome {
    Accepted,
    Rejected,
    RejectedWithVeto,
    RejectedWithVetoByOwners,
    QuorumNotMet,
    BelowThreshold,
    InsufficientDeposit,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    /// Whether this outcome is any flavor of rejection (as opposed to
    /// acceptance or a procedural non-result like `QuorumNotMet`).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Outcome::Rejected | Outcome::RejectedWithVeto | Outcome::RejectedWithVetoByOwners
        )
    }
}
