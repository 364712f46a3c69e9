// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("push note has no pushed reference named {0}")]
    RefNotFound(String),

    #[error("{reference}: newHash is not reachable from oldHash")]
    AncestryMissing { reference: String },

    #[error("{0}: local tip diverged before the fast-forward landed")]
    NonFastForward(String),

    #[error(transparent)]
    Fetch(#[from] fetch::Error),

    #[error(transparent)]
    RepoStore(#[from] repo_store::Error),
}
