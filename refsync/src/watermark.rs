// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use git_ext::Qualified;
use identifier::RepoName;

/// Applied-height watermark for one `(repo, reference)` pair. Beyond
/// spec.md §4.5's literal `{repo, reference, appliedHeight}`, `applied_nonce`
/// records the pushed reference's own nonce so a restarted worker can tell
/// "already applied this exact push" from "applied a different push that
/// happened to land at the same height" without re-reading the git ref's
/// current target.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Watermark {
    pub repo: RepoName,
    pub reference: Qualified,
    pub applied_height: u64,
    pub applied_nonce: u64,
}

pub trait WatermarkStore: Send + Sync {
    fn get(&self, repo: &RepoName, reference: &Qualified) -> Option<Watermark>;
    fn set(&self, watermark: Watermark);
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryWatermarkStore {
        entries: Mutex<HashMap<(RepoName, String), Watermark>>,
    }

    impl WatermarkStore for MemoryWatermarkStore {
        fn get(&self, repo: &RepoName, reference: &Qualified) -> Option<Watermark> {
            self.entries.lock().get(&(repo.clone(), reference.to_string())).cloned()
        }

        fn set(&self, watermark: Watermark) {
            let key = (watermark.repo.clone(), watermark.reference.to_string());
            self.entries.lock().insert(key, watermark);
        }
    }
}
