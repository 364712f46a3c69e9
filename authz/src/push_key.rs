// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use crypto::{push_key::PushKeyId, PublicKey};
use identifier::{NamespaceName, RepoName, UserAddress};
use rust_decimal::Decimal;

/// One `(namespace, repo)` pair a push key is restricted to. An empty
/// scope list on [`PushKey`] means unrestricted (spec.md §8 boundary
/// behavior).
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scope {
    pub namespace: Option<NamespaceName>,
    pub repo: RepoName,
}

/// An identity key authorized to push to one or more repos (spec.md §3).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PushKey {
    pub pub_key: PublicKey,
    pub address: UserAddress,
    pub scopes: Vec<Scope>,
    pub fee_cap: Decimal,
    pub fee_used: Decimal,
}

impl PushKey {
    pub fn id(&self) -> PushKeyId {
        PushKeyId::from(self.pub_key)
    }

    /// Empty scope is unrestricted; otherwise `(namespace, repo)` must
    /// appear in it verbatim.
    pub fn in_scope(&self, namespace: Option<&NamespaceName>, repo: &RepoName) -> bool {
        self.scopes.is_empty()
            || self
                .scopes
                .iter()
                .any(|s| s.namespace.as_ref() == namespace && &s.repo == repo)
    }
}
