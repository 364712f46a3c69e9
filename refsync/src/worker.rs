// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use repo_store::RepoStore;

use crate::{
    apply::{apply_task, Applied, ObjectFetcher},
    queue::Queue,
    watermark::WatermarkStore,
    Error,
};

/// Drains a [`Queue`] of [`crate::WatcherTask`]s, applying each against a
/// [`RepoStore`] and recording its watermark. Kept deliberately small next
/// to the teacher's `Spawner`/`JoinHandle` runtime-wrapping abstraction
/// (`link-async::spawn`, `librad::executor`): refsync has no need for
/// spawn-and-join handles or counters, only an on/off switch plus a
/// single-task-drain method a caller (or a `tokio::spawn`ed loop) can poll.
pub struct Worker<S, F, W> {
    queue: Arc<Queue>,
    repo_store: Arc<S>,
    fetcher: Arc<F>,
    watermarks: Arc<W>,
    running: Arc<AtomicBool>,
}

impl<S, F, W> Worker<S, F, W>
where
    S: RepoStore,
    F: ObjectFetcher,
    W: WatermarkStore,
{
    pub fn new(queue: Arc<Queue>, repo_store: Arc<S>, fetcher: Arc<F>, watermarks: Arc<W>) -> Self {
        Self { queue, repo_store, fetcher, watermarks, running: Arc::new(AtomicBool::new(false)) }
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

    /// Pops and applies a single ready task, if any is queued. Returns
    /// `false` when the queue had nothing ready to pop so a caller's poll
    /// loop knows to back off. A non-fast-forward failure requeues the
    /// task (spec.md §4.5 "Cancellation": a newer write raced ours in;
    /// retry rather than drop it), any other error just drops it.
    #[tracing::instrument(skip(self))]
    pub async fn run_once(&self) -> bool {
        let task = match self.queue.pop_ready() {
            Some(task) => task,
            None => return false,
        };

        let result = apply_task(&*self.repo_store, &*self.fetcher, &*self.watermarks, &task).await;
        self.queue.finish(&task);

        match result {
            Ok(Applied::NoOp) | Ok(Applied::Updated) => {}
            Err(Error::NonFastForward(reference)) => {
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
