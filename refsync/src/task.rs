// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use git_ext::{Oid, Qualified};
use identifier::RepoName;
use push_note::PushNote;

use crate::Error;

/// One unit of RefSync work: everything `apply_task` needs to bring a
/// single `(repo, reference)` up to date with one finalized push note
/// (spec.md §4.5's `{repo, reference, startHeight, endHeight}`, extended
/// with the pushed reference's own fields so a task is self-contained and
/// the worker never needs to re-look-up its originating note).
///
/// `end_height` is carried for parity with the spec's watcher-task shape;
/// a single-push task always has `start_height == end_height`, a future
/// batched watcher (coalescing several finalized pushes to the same
/// reference between drains) would set it past `start_height`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WatcherTask {
    pub repo: RepoName,
    pub reference: Qualified,
    pub start_height: u64,
    pub end_height: u64,
    pub old_hash: Oid,
    pub new_hash: Oid,
    pub objects: Vec<Oid>,
    pub nonce: u64,
}

impl WatcherTask {
    pub fn is_create(&self) -> bool {
        self.old_hash.is_zero()
    }

    pub fn is_delete(&self) -> bool {
        self.new_hash.is_zero()
    }
}

/// `onNewTx(pushNote, targetRef, height)`: the entrypoint invoked for every
/// push note the consensus layer finalizes, turning it into the watcher
/// task for one of its pushed references (spec.md §4.5 "Contract";
/// `txIndex` does not influence task construction and is the caller's own
/// bookkeeping, so it isn't threaded through here).
pub fn on_new_tx(note: &PushNote, target_ref: &Qualified, height: u64) -> Result<WatcherTask, Error> {
    let pushed = note
        .references
        .iter()
        .find(|r| &r.name == target_ref)
        .ok_or_else(|| Error::RefNotFound(target_ref.to_string()))?;

    Ok(WatcherTask {
        repo: note.repo_name.clone(),
        reference: target_ref.clone(),
        start_height: height,
        end_height: height,
        old_hash: pushed.old_hash,
        new_hash: pushed.new_hash,
        objects: pushed.objects.clone(),
        nonce: pushed.nonce,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note() -> PushNote {
        PushNote {
            repo_name: "repo1".parse().unwrap(),
            references: vec![push_note::PushedReference {
                name: "refs/heads/master".parse().unwrap(),
                old_hash: Oid::default(),
                new_hash: "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap(),
                nonce: 1,
                account_nonce: 1,
                fee: "1.0".to_string(),
                objects: vec!["e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap()],
                delete: false,
            }],
            pusher_address: crypto::SecretKey::new().public().into(),
            pusher_key_id: crypto::SecretKey::new().public().into(),
            pusher_account_nonce: 1,
            size: 10,
            timestamp: 0,
            creator_pub_key: crypto::SecretKey::new().public(),
            creator_signature: None,
            remote_node_signature: None,
        }
    }

    #[test]
    fn builds_a_task_from_a_matching_reference() {
        let note = sample_note();
        let task = on_new_tx(&note, &"refs/heads/master".parse().unwrap(), 42).unwrap();
        assert_eq!(task.repo, note.repo_name);
        assert_eq!(task.new_hash, note.references[0].new_hash);
        assert_eq!(task.start_height, 42);
        assert_eq!(task.end_height, 42);
    }

    #[test]
    fn unknown_reference_is_ref_not_found() {
        let note = sample_note();
        let err = on_new_tx(&note, &"refs/heads/other".parse().unwrap(), 1).unwrap_err();
        assert!(matches!(err, Error::RefNotFound(_)));
    }
}
