// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use rust_decimal::Decimal;

use crate::policy::Policy;

/// Who pays a contributor's push fee, and under what cap (spec.md §4.4
/// step 4).
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum FeeMode {
    PusherPays,
    RepoPays,
    /// Repo pays, up to the contributor's `feeCap`: requires both
    /// `feeUsed + fee <= feeCap` and `repo.balance >= fee`.
    RepoPaysCapped,
}

/// A repository's contributor entry, keyed by push-key id in
/// [`crate::Repository::contributors`] (spec.md §3).
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Contributor {
    pub fee_mode: FeeMode,
    pub fee_cap: Decimal,
    pub fee_used: Decimal,
    pub policies: Vec<Policy>,
}
