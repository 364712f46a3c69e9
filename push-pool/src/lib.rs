// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! A bounded, fee-prioritized staging area for unconfirmed push notes, with
//! replace-by-fee between conflicting reference updates (spec.md §4.2).

mod entry;
mod error;

use std::collections::HashMap;

use identifier::RepoName;
use parking_lot::Mutex;
use push_note::{NoteId, PushNote};

pub use entry::Entry;
pub use error::Error;

/// Pool sizing, threaded in by the caller rather than read from the
/// environment, per the ambient-stack configuration convention.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { capacity: 5_000 }
    }
}

/// Bounded, fee-prioritized staging area for unconfirmed push notes.
///
/// A single `parking_lot::Mutex` guards the whole pool: spec.md §5 calls
/// out that pool operations "do not suspend externally" and should use
/// short critical sections, which is exactly what a non-async mutex around
/// a `HashMap` gives us (matching the teacher's choice of `parking_lot`
/// over `std::sync` wherever a lock is held only across plain CPU work).
pub struct Pool {
    config: Config,
    entries: Mutex<HashMap<NoteId, Entry>>,
}

impl Pool {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &NoteId) -> Option<PushNote> {
        self.entries.lock().get(id).map(|e| e.note.clone())
    }

    pub fn repo_has_note(&self, repo: &RepoName) -> bool {
        self.entries.lock().values().any(|e| &e.note.repo_name == repo)
    }

    pub fn remove(&self, id: &NoteId) -> Option<PushNote> {
        self.entries.lock().remove(id).map(|e| e.note)
    }

    /// Admits `note` if the pool has capacity and it out-bids every
    /// conflicting incumbent, per the replace-by-fee rule (spec.md §4.2):
    /// a candidate `C` must have `C.totalFee > Σ E.totalFee` summed over
    /// the incumbents `E` conflicting with `C` on at least one
    /// `(repo, reference, nonce)` triple (see DESIGN.md's Open Question
    /// note on partial-conflict aggregation).
    #[tracing::instrument(skip(self, note), fields(note_id))]
    pub fn add(&self, note: PushNote, arrival_timestamp: u64) -> Result<(), Error> {
        let id = note.id();
        tracing::Span::current().record("note_id", tracing::field::display(&id));
        let candidate = Entry::new(note, arrival_timestamp)?;

        let mut entries = self.entries.lock();

        if entries.contains_key(&id) {
            return Err(Error::DuplicateNote(id));
        }

        let conflicting: Vec<NoteId> = entries
            .iter()
            .filter(|(_, incumbent)| incumbent.conflicts_with(&candidate))
            .map(|(id, _)| *id)
            .collect();

        if conflicting.is_empty() && entries.len() >= self.config.capacity {
            return Err(Error::PoolFull);
        }

        let displaced_fee: rust_decimal::Decimal = conflicting
            .iter()
            .map(|id| entries[id].total_fee())
            .sum();

        if !conflicting.is_empty() && candidate.total_fee() <= displaced_fee {
            return Err(Error::FeeTooLow { candidate: id });
        }

        for incumbent_id in &conflicting {
            entries.remove(incumbent_id);
        }

        if entries.len() >= self.config.capacity {
            return Err(Error::PoolFull);
        }

        tracing::info!(evicted = conflicting.len(), "admitted push note to pool");
        entries.insert(id, candidate);
        Ok(())
    }

    /// Drains every entry in consensus-proposer order: descending
    /// `feePerByte`, ties broken by ascending arrival timestamp.
    pub fn drain_ordered(&self) -> Vec<PushNote> {
        let mut entries: Vec<Entry> = self.entries.lock().values().cloned().collect();
        entries.sort_by(|a, b| {
            b.fee_per_byte()
                .cmp(&a.fee_per_byte())
                .then(a.arrival_timestamp.cmp(&b.arrival_timestamp))
        });
        entries.into_iter().map(|e| e.note).collect()
    }
}
