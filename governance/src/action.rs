// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! The closed set of proposal actions, per design note 9: a tagged variant
//! instead of the source's dynamic `map[string][]byte` action data, with an
//! opaque-bytes fallback so the on-disk form stays forward compatible with
//! tags this build doesn't know about yet.

use crypto::push_key::PushKeyId;
use git_ext::Oid;

/// `actionData` for a merge-request proposal (spec.md §4.7).
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MergeRequestData {
    pub base_branch: String,
    pub base_hash: Option<Oid>,
    pub target_branch: String,
    pub target_hash: Option<Oid>,
}

impl MergeRequestData {
    pub(crate) fn validate(&self) -> Result<(), crate::Error> {
        if self.base_hash.is_none() {
            return Err(crate::Error::MissingBaseHash);
        }
        if self.target_hash.is_none() {
            return Err(crate::Error::MissingTargetHash);
        }
        Ok(())
    }
}

/// `actionData` for a push-key registration proposal.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegisterPushKeyData {
    pub push_key_id: PushKeyId,
    pub scopes: Vec<String>,
}

/// `actionData` for a contributor-addition proposal.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AddContributorsData {
    pub push_key_ids: Vec<PushKeyId>,
}

/// The closed set of proposal actions a [`crate::RepoProposal`] can carry.
///
/// `Opaque` preserves the on-disk-compatibility the source's open-ended map
/// gave for free: a tag this build doesn't recognize round-trips as raw
/// bytes instead of failing to decode.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action")]
pub enum Action {
    MergeRequest(MergeRequestData),
    RegisterPushKey(RegisterPushKeyData),
    AddContributors(AddContributorsData),
    #[serde(other)]
    Opaque,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::MergeRequest(_) => "MergeRequest",
            Action::RegisterPushKey(_) => "RegisterPushKey",
            Action::AddContributors(_) => "AddContributors",
            Action::Opaque => "Opaque",
        }
    }

    pub fn as_merge_request(&self) -> Option<&MergeRequestData> {
        match self {
            Action::MergeRequest(data) => Some(data),
            _ => None,
        }
    }
}
