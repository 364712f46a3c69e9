// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::path::PathBuf;

use structopt::StructOpt;

/// Node process arguments (spec.md §6's collaborator surface is out of
/// scope for implementation — `sign`/`verify`/`issue`/`merge-request` are
/// a client's concern — but this binary still needs somewhere to run the
/// push-admission and reference-synchronization pipeline against, so the
/// argument-parsing idiom is carried over unmodified from `node-lib::args`).
#[derive(Debug, StructOpt)]
#[structopt(name = "zango-node")]
pub struct Args {
    /// Directory backing the node's git object stores, one bare repository
    /// per managed repo name.
    #[structopt(long, parse(from_os_str), env = "ZANGO_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Maximum number of push notes the admission pool holds at once.
    #[structopt(long, default_value = "1024")]
    pub pool_capacity: usize,

    /// Maximum packfile delta objects accepted by a single push.
    #[structopt(long, default_value = "100000")]
    pub max_delta_objects: usize,

    /// Maximum on-disk size, in bytes, any single managed repository may
    /// grow to before further pushes are rejected.
    #[structopt(long, default_value = "53687091200")]
    pub max_repo_size: u64,

    /// Number of concurrent reference-synchronization workers draining the
    /// refsync queue.
    #[structopt(long, default_value = "4")]
    pub refsync_workers: usize,

    /// Overall in-flight object-fetch requests across all providers.
    #[structopt(long, default_value = "32")]
    pub fetch_max_in_flight: usize,

    /// In-flight object-fetch requests against any single provider.
    #[structopt(long, default_value = "4")]
    pub fetch_max_in_flight_per_provider: usize,
}
