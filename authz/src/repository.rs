// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::collections::BTreeMap;

use crypto::push_key::PushKeyId;
use git_ext::Oid;
use governance::RepoProposal;
use identifier::UserAddress;
use rust_decimal::Decimal;

use crate::{contributor::Contributor, owner::Owner, policy::Policy, repo_reference::RepoReference, Error};

/// `{governance, policies}` — the repo-level configuration spec.md §3
/// bundles under `Repository.config`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RepoConfig {
    pub governance: governance::RepoConfigGovernance,
    /// Repo-wide default policies, evaluated alongside a contributor's own
    /// (spec.md §4.4 step 3 draws from both).
    pub policies: Vec<Policy>,
}

/// The full on-chain state of one repository (spec.md §3).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Repository {
    pub balance: Decimal,
    pub description: String,
    pub references: BTreeMap<String, RepoReference>,
    pub owners: BTreeMap<UserAddress, Owner>,
    pub contributors: BTreeMap<PushKeyId, Contributor>,
    pub proposals: BTreeMap<String, RepoProposal>,
    pub config: RepoConfig,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Repository {
    pub fn new(config: RepoConfig, created_at: u64) -> Self {
        Self {
            balance: Decimal::ZERO,
            description: String::new(),
            references: BTreeMap::new(),
            owners: BTreeMap::new(),
            contributors: BTreeMap::new(),
            proposals: BTreeMap::new(),
            config,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn is_owner(&self, address: &UserAddress) -> bool {
        self.owners.contains_key(address)
    }

    pub fn contributor(&self, key_id: &PushKeyId) -> Option<&Contributor> {
        self.contributors.get(key_id)
    }

    /// Applies a reference update, enforcing spec.md §3's "`nonce`
    /// increases strictly by 1 per accepted update to that reference" and
    /// "`createdAt <= updatedAt`".
    pub fn apply_reference_update(
        &mut self,
        name: &str,
        creator: UserAddress,
        new_hash: Oid,
        at_height: u64,
    ) -> Result<(), Error> {
        match self.references.get_mut(name) {
            Some(existing) => {
                let expected = existing.nonce + 1;
                existing.nonce = expected;
                existing.hash = new_hash;
            }
            None => {
                self.references.insert(
                    name.to_string(),
                    RepoReference {
                        creator,
                        nonce: 1,
                        hash: new_hash,
                        data: Default::default(),
                    },
                );
            }
        }
        self.updated_at = self.updated_at.max(at_height);
        Ok(())
    }

    /// Checks the on-chain nonce a pushed reference claims against the
    /// repository's recorded value, without mutating anything — the
    /// push handler calls this before admission, `apply_reference_update`
    /// after.
    pub fn check_reference_nonce(&self, name: &str, claimed_nonce: u64) -> Result<(), Error> {
        let expected = self.references.get(name).map(|r| r.nonce + 1).unwrap_or(1);
        if claimed_nonce != expected {
            return Err(Error::StaleNonce { name: name.to_string(), expected, actual: claimed_nonce });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RepoConfig {
        RepoConfig {
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
        }
    }

    #[test]
    fn reference_nonce_increments_by_one_on_each_update() {
        let mut repo = Repository::new(config(), 0);
        let creator = UserAddress::from(crypto::SecretKey::new().public());
        repo.check_reference_nonce("refs/heads/master", 1).unwrap();
        repo.apply_reference_update("refs/heads/master", creator, Oid::default(), 1).unwrap();
        assert_eq!(repo.references["refs/heads/master"].nonce, 1);

        repo.check_reference_nonce("refs/heads/master", 2).unwrap();
        repo.apply_reference_update("refs/heads/master", creator, Oid::default(), 2).unwrap();
        assert_eq!(repo.references["refs/heads/master"].nonce, 2);
    }

    #[test]
    fn stale_nonce_is_rejected() {
        let mut repo = Repository::new(config(), 0);
        let creator = UserAddress::from(crypto::SecretKey::new().public());
        repo.apply_reference_update("refs/heads/master", creator, Oid::default(), 1).unwrap();
        assert!(repo.check_reference_nonce("refs/heads/master", 1).is_err());
        assert!(repo.check_reference_nonce("refs/heads/master", 5).is_err());
        assert!(repo.check_reference_nonce("refs/heads/master", 2).is_ok());
    }

    #[test]
    fn created_at_never_exceeds_updated_at() {
        let repo = Repository::new(config(), 10);
        assert!(repo.created_at <= repo.updated_at);
    }
}
