// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use std::path::PathBuf;

use crate::args::Args;

/// Gathers every subsystem's own `Config` into one struct, the way
/// `node-lib::cfg::Cfg` gathers `args::Args` into the typed config each
/// collaborator (`net::peer::Config`, `membership::Params`, ...) expects.
pub struct Config {
    pub data_dir: PathBuf,
    pub pool: push_pool::Config,
    pub push_handler: push_handler::Config,
    pub fetch: fetch::Config,
    pub refsync_workers: usize,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
            pool: push_pool::Config { capacity: args.pool_capacity },
            push_handler: push_handler::Config {
                max_delta_objects: args.max_delta_objects,
                max_repo_size: args.max_repo_size,
            },
            fetch: fetch::Config {
                max_in_flight: args.fetch_max_in_flight,
                max_in_flight_per_provider: args.fetch_max_in_flight_per_provider,
            },
            refsync_workers: args.refsync_workers.max(1),
        }
    }
}
