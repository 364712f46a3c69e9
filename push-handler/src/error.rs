// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use git_ext::reference::name::Error as RefNameError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("reference `{0}` has no accompanying transaction detail")]
    MissingTxDetail(String),

    #[error("reference `{reference}` declares `{declared}` but its signed detail covers `{signed}`")]
    ReferenceMismatch { reference: String, declared: String, signed: String },

    #[error("both old and new hash are zero for reference `{0}`")]
    ZeroZero(String),

    #[error(transparent)]
    InvalidReferenceName(#[from] RefNameError),

    #[error(transparent)]
    Token(#[from] push_token::TokenError),

    #[error(transparent)]
    Authorization(#[from] authz::Error),

    #[error("delta-object count {got} exceeds the configured maximum of {max}")]
    TooManyDeltaObjects { got: usize, max: usize },

    #[error("repository size {got} would exceed the configured maximum of {max}")]
    RepoSizeExceeded { got: u64, max: u64 },

    #[error(transparent)]
    RepoStore(#[from] repo_store::Error),

    #[error(transparent)]
    Pool(#[from] push_pool::Error),

    #[error("failed to sign the push note")]
    Signing,
}
