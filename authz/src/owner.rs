// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use identifier::UserAddress;

/// An owner's standing in a repository (spec.md §3 `Repository.owners`).
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Owner {
    pub creator: UserAddress,
    pub joined_at: u64,
    /// Owners with `veto = true` count towards `noWithVetoByOwners`'s
    /// denominator in proposal outcome evaluation.
    pub veto: bool,
}
