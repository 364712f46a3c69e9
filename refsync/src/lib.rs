// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! Reference synchronization: turns finalized push notes into watcher
//! tasks and applies them to the local git object store, one in-flight
//! task per `(repo, reference)` at a time (spec.md §4.5).

mod apply;
mod error;
mod queue;
mod task;
mod watermark;
mod worker;

pub use apply::{apply_task, Applied, ObjectFetcher};
pub use error::Error;
pub use queue::Queue;
pub use task::{on_new_tx, WatcherTask};
pub use watermark::{Watermark, WatermarkStore};
pub use worker::Worker;
