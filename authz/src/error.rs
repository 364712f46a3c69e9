// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("pusher is not an owner of this repository")]
    NotAnOwner,

    #[error("pusher is not a contributor on this repository")]
    NotAContributor,

    #[error("push key is out of scope for this repo/namespace")]
    OutOfScope,

    #[error("a policy explicitly denies this action on this reference")]
    PolicyDeny,

    #[error("pusher account balance is insufficient to cover the fee")]
    InsufficientBalance,

    #[error("the contributor's fee cap would be exceeded by this push")]
    FeeCapExceeded,

    #[error("merge-write requires an accepted merge-request proposal")]
    ProposalNotAccepted,

    #[error("reference `{name}` expected nonce {expected} but got {actual}")]
    StaleNonce { name: String, expected: u64, actual: u64 },
}
