// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("a proposal with id `{0}` already exists")]
    AlreadyExists(String),

    #[error("proposal not found")]
    NotFound,

    #[error("proposal is already closed")]
    AlreadyClosed,

    #[error("base branch hash is required")]
    MissingBaseHash,

    #[error("target branch hash is required")]
    MissingTargetHash,

    #[error("`feeDepositEndAt` must not be after `endAt`")]
    DepositWindowAfterEnd,

    #[error("the fee deposit window has closed")]
    DepositWindowClosed,

    #[error("action data does not match the declared action")]
    InvalidActionData,
}
