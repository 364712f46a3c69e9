// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! Repo proposal governance: the state machine a merge request (and the
//! other closed-set proposal actions) is an instance of (spec.md §4.7).
//!
//! This crate models `RepoProposal` and its voting/outcome/refund rules in
//! isolation from the repository it is stored in — `zango-authz` holds the
//! `Repository` type whose `proposals` map keys onto [`RepoProposal`] by
//! id, per design note 9's "proposals never hold a back-pointer".

mod action;
mod config;
mod error;
mod outcome;
mod proposal;

pub use action::{Action, AddContributorsData, MergeRequestData, RegisterPushKeyData};
pub use config::{FeeRefundPolicy, RepoConfigGovernance, VotingWeight};
pub use error::Error;
pub use outcome::Outcome;
pub use proposal::{RepoProposal, VoteChoice};
