// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! The node binary: wires the push pool, authorization ledger and
//! reference-synchronization driver together and runs them until
//! interrupted. The git receive-pack listener that feeds `push_handler`
//! and the DHT-backed provider directory that feeds `fetch` are both
//! non-goals of spec.md §1 ("does not prescribe the wire format for the
//! peer-to-peer transport") — this binary stops at the boundary of those
//! collaborator traits, the same seam `seed/src/main.rs` stops at before
//! `librad::net::peer::Peer`'s own listener.

mod args;
mod config;
mod logging;
mod object_fetcher;
mod proposal_lookup;
mod refsync_driver;
mod repository_ledger;
mod watermark_store;

use std::{path::Path, sync::Arc, time::Duration};

use structopt::StructOpt;

use args::Args;
use config::Config;
use object_fetcher::{ProviderDirectory, RequesterObjectFetcher};
use refsync_driver::RefSyncDriver;
use repo_store::GitRepoStore;
use repository_ledger::RepositoryLedger;
use watermark_store::MemoryWatermarkStore;

/// Stands in for the DHT dial-out this binary doesn't perform (spec.md §1's
/// peer-to-peer transport non-goal): every query legitimately reports
/// `fetch::Error::NoProvider` until a real directory is wired in, rather
/// than fabricating a peer that was never discovered.
struct NoProviders;

impl ProviderDirectory for NoProviders {
    fn providers_for(&self, _repo: &identifier::RepoName) -> Vec<Arc<dyn fetch::Provider>> {
        Vec::new()
    }
}

/// Opens a [`GitRepoStore`] for every bare repository already present
/// under `data_dir` (one subdirectory per managed repo name), registering
/// each with the refsync driver so a restart picks back up where the last
/// persisted watermark left off (spec.md §7 "Recovery").
fn open_existing_repos<F, W>(data_dir: &Path, driver: &RefSyncDriver<F, W>) -> anyhow::Result<usize>
where
    F: refsync::ObjectFetcher,
    W: refsync::WatermarkStore,
{
    let mut opened = 0;
    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else { continue };
        let Ok(repo_name) = name.parse::<identifier::RepoName>() else {
            tracing::warn!(name, "skipping data_dir entry that is not a valid repo name");
            continue;
        };
        let store = Arc::new(GitRepoStore::open(entry.path())?);
        driver.register_repo(repo_name, store);
        opened += 1;
    }
    Ok(opened)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args = Args::from_args();
    let config = Config::from(&args);

    std::fs::create_dir_all(&config.data_dir)?;

    let ledger = Arc::new(RepositoryLedger::new());
    let pool = Arc::new(push_pool::Pool::new(config.pool));
    let watermarks = Arc::new(MemoryWatermarkStore::new());
    let fetcher = Arc::new(RequesterObjectFetcher::new(NoProviders, config.fetch));
    let queue = Arc::new(refsync::Queue::new());
    let driver = Arc::new(RefSyncDriver::new(queue, fetcher, watermarks));

    let opened = open_existing_repos(&config.data_dir, &driver)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        repos = opened,
        pool_capacity = config.pool.capacity,
        refsync_workers = config.refsync_workers,
        "zango-node starting"
    );

    driver.start();
    let mut worker_handles = Vec::with_capacity(config.refsync_workers);
    for worker_id in 0..config.refsync_workers {
        let driver = driver.clone();
        worker_handles.push(tokio::spawn(async move {
            while driver.is_running() {
                if !driver.run_once().await {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
            }
            tracing::debug!(worker_id, "refsync worker stopped");
        }));
    }

    tracing::info!(notes_in_pool = pool.len(), repos_governed = ledger.len(), "node ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, draining refsync workers");
    driver.stop();
    for handle in worker_handles {
        handle.await?;
    }

    Ok(())
}
