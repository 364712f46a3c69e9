// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use identifier::RepoName;
use parking_lot::RwLock;
use refsync::{apply_task, Applied, ObjectFetcher, Queue, WatcherTask, WatermarkStore};
use repo_store::GitRepoStore;

/// Multi-repo counterpart to `refsync::Worker`: a node manages many
/// repositories, each behind its own [`GitRepoStore`] (spec.md §4.5's
/// "Local Repo Adapter" row is explicitly one adapter per repo), whereas
/// `refsync::Worker` is generic over a single `S: RepoStore` for the
/// common single-repo-per-process case. This driver keeps the same
/// drain-one-task-per-poll shape, looking up the right store for each
/// task's `repo` field before delegating to the shared [`apply_task`]
/// algorithm.
pub struct RefSyncDriver<F, W> {
    queue: Arc<Queue>,
    stores: RwLock<HashMap<RepoName, Arc<GitRepoStore>>>,
    fetcher: Arc<F>,
    watermarks: Arc<W>,
    running: AtomicBool,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no repo store registered for {0}")]
    UnknownRepo(RepoName),
}

impl<F, W> RefSyncDriver<F, W>
where
    F: ObjectFetcher,
    W: WatermarkStore,
{
    pub fn new(queue: Arc<Queue>, fetcher: Arc<F>, watermarks: Arc<W>) -> Self {
        Self {
            queue,
            stores: RwLock::new(HashMap::new()),
            fetcher,
            watermarks,
            running: AtomicBool::new(false),
        }
    }

    pub fn register_repo(&self, name: RepoName, store: Arc<GitRepoStore>) {
        self.stores.write().insert(name, store);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn enqueue(&self, task: WatcherTask) {
        self.queue.push(task);
    }

    /// Pops and applies a single ready task, if any is queued, mirroring
    /// `refsync::Worker::run_once` but routing to the task's own repo
    /// store first (spec.md §4.5 "Algorithm per task").
    #[tracing::instrument(skip(self))]
    pub async fn run_once(&self) -> bool {
        let task = match self.queue.pop_ready() {
            Some(task) => task,
            None => return false,
        };

        let store = self.stores.read().get(&task.repo).cloned();
        let result = match store {
            Some(store) => apply_task(&*store, &*self.fetcher, &*self.watermarks, &task)
                .await
                .map_err(DriverError::Apply),
            None => Err(DriverError::Driver(Error::UnknownRepo(task.repo.clone()))),
        };
        self.queue.finish(&task);

        match result {
            Ok(Applied::NoOp) | Ok(Applied::Updated) => {}
            Err(DriverError::Apply(refsync::Error::NonFastForward(reference))) => {
                tracing::info!(%reference, "requeueing after non-fast-forward race");
                self.queue.push(task);
            }
            Err(err) => {
                tracing::warn!(repo = %task.repo, reference = %task.reference, "dropping task: {err}");
            }
        }
        true
    }
}

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error(transparent)]
    Apply(refsync::Error),
    #[error(transparent)]
    Driver(Error),
}
