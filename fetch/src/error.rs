// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use git_ext::Oid;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("no provider claims object {0}")]
    NoProvider(Oid),

    #[error("every claimant of object {0} failed the send phase")]
    AllProvidersFailed(Oid),

    #[error("received blob for {expected} hashes as {actual}")]
    ObjectHashMismatch { expected: Oid, actual: Oid },
}
