// Copyright © 2019-2026 The Zango Contributors
//
// This file is part of zango, distributed under the GPLv3.

//! The authorization engine (spec.md §4.4) and the repository state model
//! it evaluates against: owners, contributors, policies, and the fee/scope
//! gates that feed into push admission.

mod authorize;
mod contributor;
mod error;
mod owner;
mod policy;
mod push_key;
mod repo_reference;
mod repository;

pub use authorize::{authorize, PushAction};
pub use contributor::{Contributor, FeeMode};
pub use error::Error;
pub use owner::Owner;
pub use policy::{Effect, Policy, PolicyAction};
pub use push_key::{PushKey, Scope};
pub use repo_reference::{RefData, RepoReference};
pub use repository::{RepoConfig, Repository};
