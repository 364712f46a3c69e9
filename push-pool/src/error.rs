// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

use push_note::NoteId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("the pool is at capacity")]
    PoolFull,

    #[error("{candidate} does not out-bid the conflicting entries it would displace")]
    FeeTooLow { candidate: NoteId },

    #[error("a conflicting entry with a strictly better fee rate is already in the pool")]
    ConflictingReference,

    #[error("note {0} is already in the pool")]
    DuplicateNote(NoteId),

    #[error("fee `{0}` is not a valid decimal amount")]
    InvalidFee(String),
}
