// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::{convert::Infallible, fmt};

use crypto::{push_key::PushKeyId, PublicKey, Signature};
use identifier::{RepoName, UserAddress};
use link_canonical::{
    json::{Number, Value},
    Canonical, CjsonMap,
};
use sha2::{Digest, Sha256};

use crate::pushed_reference::PushedReference;

/// The broadcast record of a single client push.
///
/// Its hash (see [`PushNote::id`]) is the canonical-bytes hash **with
/// signature fields elided**; that hash is the note's identity across the
/// pool and the chain.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PushNote {
    pub repo_name: RepoName,
    pub references: Vec<PushedReference>,
    pub pusher_address: UserAddress,
    pub pusher_key_id: PushKeyId,
    pub pusher_account_nonce: u64,
    pub size: u64,
    pub timestamp: u64,
    pub creator_pub_key: PublicKey,
    pub creator_signature: Option<Signature>,
    pub remote_node_signature: Option<Signature>,
}

/// A push note's identity: the canonical-bytes hash of the note with both
/// signature fields elided.
#[derive(Clone, Copy, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NoteId([u8; 32]);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId({self})")
    }
}

impl NoteId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl PushNote {
    /// Total fee across every pushed reference (pushed references carry
    /// per-reference fees; the pool's `feePerByte` is this over `size`).
    pub fn total_fee(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(|r| r.fee.as_str())
    }

    pub fn id(&self) -> NoteId {
        let bytes = self
            .canonical_form()
            .expect("PushNote::canonical_form is infallible");
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        NoteId(out)
    }
}

impl Canonical for PushNote {
    type Error = Infallible;

    fn canonical_form(&self) -> Result<Vec<u8>, Self::Error> {
        let mut map = CjsonMap::new();
        map.insert("repoName".into(), Value::String(self.repo_name.as_str().into()));
        map.insert(
            "references".into(),
            Value::Array(self.references.iter().map(PushedReference::to_cjson).collect()),
        );
        map.insert(
            "pusherAddress".into(),
            Value::String(self.pusher_address.to_string().into()),
        );
        map.insert(
            "pusherKeyID".into(),
            Value::String(self.pusher_key_id.to_string().into()),
        );
        map.insert(
            "pusherAccountNonce".into(),
            Value::Number(Number::U64(self.pusher_account_nonce)),
        );
        map.insert("size".into(), Value::Number(Number::U64(self.size)));
        map.insert("timestamp".into(), Value::Number(Number::U64(self.timestamp)));
        map.insert(
            "creatorPubKey".into(),
            Value::String(self.creator_pub_key.to_string().into()),
        );
        Ok(Value::Object(map)
            .canonical_form()
            .expect("Value::canonical_form is infallible"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PushNote {
        PushNote {
            repo_name: "repo1".parse().unwrap(),
            references: vec![PushedReference {
                name: "refs/heads/master".parse().unwrap(),
                old_hash: git_ext::Oid::default(),
                new_hash: "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap(),
                nonce: 1,
                account_nonce: 1,
                fee: "1.2".to_string(),
                objects: vec![],
                delete: false,
            }],
            pusher_address: crypto::SecretKey::new().public().into(),
            pusher_key_id: crypto::SecretKey::new().public().into(),
            pusher_account_nonce: 1,
            size: 128,
            timestamp: 1_700_000_000,
            creator_pub_key: crypto::SecretKey::new().public(),
            creator_signature: None,
            remote_node_signature: None,
        }
    }

    #[test]
    fn id_is_stable_across_repeated_calls() {
        let note = sample();
        assert_eq!(note.id(), note.id());
    }

    #[test]
    fn id_does_not_depend_on_signature_fields() {
        let mut a = sample();
        let mut b = sample();
        a.creator_signature = None;
        b.creator_signature = Some(crypto::SecretKey::new().sign(b"whatever"));
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn id_changes_if_a_reference_changes() {
        let a = sample();
        let mut b = sample();
        b.references[0].nonce = 2;
        assert_ne!(a.id(), b.id());
    }
}
