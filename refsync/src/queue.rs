// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::collections::{HashSet, VecDeque};

use parking_lot::Mutex;

use crate::task::WatcherTask;

type Key = (identifier::RepoName, String);

fn key_of(task: &WatcherTask) -> Key {
    (task.repo.clone(), task.reference.to_string())
}

struct State {
    pending: VecDeque<WatcherTask>,
    in_flight: HashSet<Key>,
}

/// At most one in-flight watcher task per `(repo, reference)` pair
/// (spec.md §4.5 "Cancellation": a later finalized push to the same
/// reference preempts an in-flight apply for an earlier one rather than
/// racing it; here we model that as "don't start a second worker on the
/// same key while one is running", with the requeue itself handled by the
/// caller pushing the newer task back in after the in-flight one finishes).
pub struct Queue {
    state: Mutex<State>,
}

impl Default for Queue {
    fn default() -> Self {
        Self { state: Mutex::new(State { pending: VecDeque::new(), in_flight: HashSet::new() }) }
    }
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_size(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn has_task(&self, repo: &identifier::RepoName, reference: &str) -> bool {
        let key = (repo.clone(), reference.to_string());
        let state = self.state.lock();
        state.in_flight.contains(&key) || state.pending.iter().any(|t| key_of(t) == key)
    }

    pub fn push(&self, task: WatcherTask) {
        self.state.lock().pending.push_back(task);
    }

    /// Pops the oldest pending task whose key isn't already in flight,
    /// marking it in flight. Tasks whose key collides with one already
    /// running stay queued behind it.
    pub fn pop_ready(&self) -> Option<WatcherTask> {
        let mut state = self.state.lock();
        let position = state.pending.iter().position(|t| !state.in_flight.contains(&key_of(t)))?;
        let task = state.pending.remove(position)?;
        state.in_flight.insert(key_of(&task));
        Some(task)
    }

    /// Marks `task`'s key no longer in flight, whether it succeeded or
    /// failed; callers that want a non-fast-forward retried requeue it
    /// themselves after calling this.
    pub fn finish(&self, task: &WatcherTask) {
        self.state.lock().in_flight.remove(&key_of(task));
    }
}

#[cfg(test)]
mod tests {
    use git_ext::Oid;

    use super::*;

    fn task(repo: &str, reference: &str) -> WatcherTask {
        WatcherTask {
            repo: repo.parse().unwrap(),
            reference: reference.parse().unwrap(),
            start_height: 1,
            end_height: 1,
            old_hash: Oid::default(),
            new_hash: "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".parse().unwrap(),
            objects: vec![],
            nonce: 1,
        }
    }

    #[test]
    fn pop_ready_marks_in_flight_and_blocks_a_second_pop_of_same_key() {
        let queue = Queue::new();
        queue.push(task("repo1", "refs/heads/master"));
        queue.push(task("repo1", "refs/heads/master"));

        let first = queue.pop_ready().unwrap();
        assert!(queue.has_task(&first.repo, &first.reference.to_string()));
        assert!(queue.pop_ready().is_none(), "second task with same key must stay queued");

        queue.finish(&first);
        assert!(queue.pop_ready().is_some(), "finishing frees the key for the queued duplicate");
    }

    #[test]
    fn distinct_keys_pop_independently() {
        let queue = Queue::new();
        queue.push(task("repo1", "refs/heads/master"));
        queue.push(task("repo1", "refs/heads/dev"));

        assert!(queue.pop_ready().is_some());
        assert!(queue.pop_ready().is_some());
        assert_eq!(queue.queue_size(), 0);
    }

    #[test]
    fn queue_size_reflects_only_pending() {
        let queue = Queue::new();
        queue.push(task("repo1", "refs/heads/master"));
        assert_eq!(queue.queue_size(), 1);
        let t = queue.pop_ready().unwrap();
        assert_eq!(queue.queue_size(), 0);
        queue.finish(&t);
        assert_eq!(queue.queue_size(), 0);
    }
}
