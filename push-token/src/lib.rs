// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! The push token: a compact textual token binding a [`TxDetail`] to a push
//! key signature, plus the PEM-wrapped form that rides inside a git
//! signature, plus the client-side signing state machine that produces it.

mod detail;
mod pem;
mod sign;
mod token;

pub use detail::TxDetail;
pub use pem::{PemError, PEM_TAG};
pub use sign::{EnvSource, PushKeyUnlocker, RepoResolver, SignError, SigningSession};
pub use token::{decode, encode, verify_pem, TokenError};
