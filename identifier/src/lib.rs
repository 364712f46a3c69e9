// Copyright © 2021-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! Identifiers the rest of the push path is built around: a user's bech32
//! address, a repository's bare name, an optional user-namespace, and the
//! URI forms a client uses to address a repository (`a/<address>/<repo>`,
//! `r/<repo>`, `ns/<name>/<repo>`).

mod address;
mod name;
mod uri;

pub use address::{AddressParseError, UserAddress};
pub use name::{NameError, NamespaceName, RepoName};
pub use uri::{ResourceUri, UriParseError};
