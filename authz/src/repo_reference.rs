// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use git_ext::Oid;
use identifier::UserAddress;

/// The issue/merge-request tracking data a repo reference carries, distinct
/// from the git object graph itself.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RefData {
    pub labels: Vec<String>,
    pub assignees: Vec<UserAddress>,
    pub closed: bool,
}

/// A named reference's on-chain state within a [`crate::Repository`]
/// (spec.md §3 `Repository.references`) — not to be confused with
/// `zango_push_note::PushedReference`, the per-push record of a git ref
/// update; this is the repository's persistent record of that reference's
/// issue/MR metadata and update count.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RepoReference {
    pub creator: UserAddress,
    /// Increases strictly by 1 per accepted update (spec.md §3 invariant).
    pub nonce: u64,
    pub hash: Oid,
    pub data: RefData,
}
