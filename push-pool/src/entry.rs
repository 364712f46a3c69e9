// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::str::FromStr;

use push_note::PushNote;
use rust_decimal::Decimal;

use crate::error::Error;

/// A note's standing in the pool: the note itself plus the bookkeeping the
/// pool needs to order and evict entries.
#[derive(Clone, Debug)]
pub struct Entry {
    pub note: PushNote,
    pub arrival_timestamp: u64,
    total_fee: Decimal,
}

fn parse_fee(fee: &str) -> Result<Decimal, Error> {
    Decimal::from_str(fee).map_err(|_| Error::InvalidFee(fee.to_string()))
}

impl Entry {
    pub fn new(note: PushNote, arrival_timestamp: u64) -> Result<Self, Error> {
        let mut total_fee = Decimal::ZERO;
        for reference in &note.references {
            total_fee += parse_fee(&reference.fee)?;
        }
        Ok(Self {
            note,
            arrival_timestamp,
            total_fee,
        })
    }

    pub fn total_fee(&self) -> Decimal {
        self.total_fee
    }

    /// `totalFee / billableSize`, spec.md §3's pool-entry `feePerByte`.
    /// Zero-size notes (no bytes pushed, e.g. a pure ref deletion) are given
    /// a fee rate equal to their total fee, so they neither divide by zero
    /// nor become unconditionally winning or losing against sized entries.
    pub fn fee_per_byte(&self) -> Decimal {
        if self.note.size == 0 {
            self.total_fee
        } else {
            self.total_fee / Decimal::from(self.note.size)
        }
    }

    /// Two entries conflict iff they share a `(repoName, reference.name,
    /// reference.nonce)` triple.
    pub fn conflicts_with(&self, other: &Entry) -> bool {
        if self.note.repo_name != other.note.repo_name {
            return false;
        }
        self.note.references.iter().any(|a| {
            other
                .note
                .references
                .iter()
                .any(|b| a.name == b.name && a.nonce == b.nonce)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git_ext::Oid;
    use push_note::PushedReference;

    fn reference(name: &str, nonce: u64, fee: &str) -> PushedReference {
        PushedReference {
            name: name.parse().unwrap(),
            old_hash: Oid::default(),
            new_hash: "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap(),
            nonce,
            account_nonce: nonce,
            fee: fee.to_string(),
            objects: vec![],
            delete: false,
        }
    }

    fn note(repo: &str, references: Vec<PushedReference>, size: u64) -> PushNote {
        PushNote {
            repo_name: repo.parse().unwrap(),
            references,
            pusher_address: crypto::SecretKey::new().public().into(),
            pusher_key_id: crypto::SecretKey::new().public().into(),
            pusher_account_nonce: 1,
            size,
            timestamp: 1_700_000_000,
            creator_pub_key: crypto::SecretKey::new().public(),
            creator_signature: None,
            remote_node_signature: None,
        }
    }

    #[test]
    fn fee_per_byte_divides_total_fee_by_size() {
        let entry = Entry::new(note("repo1", vec![reference("refs/heads/master", 1, "10")], 100), 0).unwrap();
        assert_eq!(entry.fee_per_byte(), Decimal::from_str("0.1").unwrap());
    }

    #[test]
    fn entries_on_different_repos_never_conflict() {
        let a = Entry::new(note("repo1", vec![reference("refs/heads/master", 1, "1")], 10), 0).unwrap();
        let b = Entry::new(note("repo2", vec![reference("refs/heads/master", 1, "1")], 10), 0).unwrap();
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn entries_sharing_name_and_nonce_conflict() {
        let a = Entry::new(note("repo1", vec![reference("refs/heads/x", 5, "1")], 10), 0).unwrap();
        let b = Entry::new(note("repo1", vec![reference("refs/heads/x", 5, "2")], 10), 0).unwrap();
        assert!(a.conflicts_with(&b));
    }

    #[test]
    fn same_name_different_nonce_does_not_conflict() {
        let a = Entry::new(note("repo1", vec![reference("refs/heads/x", 5, "1")], 10), 0).unwrap();
        let b = Entry::new(note("repo1", vec![reference("refs/heads/x", 6, "2")], 10), 0).unwrap();
        assert!(!a.conflicts_with(&b));
    }
}
