// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::collections::HashMap;

use parking_lot::RwLock;
use refsync::{Watermark, WatermarkStore};

/// In-memory [`WatermarkStore`]: the production seam `zango-refsync` reads
/// through instead of `refsync::watermark::memory::MemoryWatermarkStore`,
/// which is `#[cfg(test)]`-only. A durable node would persist this keyed
/// by `(repo, reference)` in the same store `RepositoryLedger` stands in
/// for (spec.md §7 "Recovery": a crash recovers by replaying finalized
/// push notes from the last persisted `appliedHeight` watermark).
#[derive(Default)]
pub struct MemoryWatermarkStore {
    entries: RwLock<HashMap<(identifier::RepoName, String), Watermark>>,
}

impl MemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WatermarkStore for MemoryWatermarkStore {
    fn get(&self, repo: &identifier::RepoName, reference: &git_ext::Qualified) -> Option<Watermark> {
        self.entries.read().get(&(repo.clone(), reference.to_string())).cloned()
    }

    fn set(&self, watermark: Watermark) {
        let key = (watermark.repo.clone(), watermark.reference.to_string());
        self.entries.write().insert(key, watermark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watermark(nonce: u64) -> Watermark {
        Watermark {
            repo: "repo1".parse().unwrap(),
            reference: "refs/heads/master".parse().unwrap(),
            applied_height: 10,
            applied_nonce: nonce,
        }
    }

    #[test]
    fn unset_reference_has_no_watermark() {
        let store = MemoryWatermarkStore::new();
        assert!(store.get(&"repo1".parse().unwrap(), &"refs/heads/master".parse().unwrap()).is_none());
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = MemoryWatermarkStore::new();
        store.set(watermark(1));
        let got = store.get(&"repo1".parse().unwrap(), &"refs/heads/master".parse().unwrap()).unwrap();
        assert_eq!(got.applied_nonce, 1);
    }

    #[test]
    fn later_set_overwrites_earlier() {
        let store = MemoryWatermarkStore::new();
        store.set(watermark(1));
        store.set(watermark(2));
        let got = store.get(&"repo1".parse().unwrap(), &"refs/heads/master".parse().unwrap()).unwrap();
        assert_eq!(got.applied_nonce, 2);
    }
}
